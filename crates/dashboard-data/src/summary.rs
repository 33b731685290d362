//! Headline figures for the dashboard landing page.

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use dashboard_core::calculations::{RateCalculator, UNKNOWN_KEYWORD};
use dashboard_core::models::CaseRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_incidents: usize,
    pub total_stations: usize,
    /// Size of the busiest calendar month by report date.
    pub peak_month_incidents: usize,
    pub top_keyword: String,
    pub avg_distance_km: f64,
}

/// Compute the landing-page figures. Every field is defined for empty input.
pub fn summarize(records: &[CaseRecord]) -> DashboardStats {
    let stations: HashSet<&str> = records.iter().map(CaseRecord::station_id).collect();

    let distances: Vec<f64> = records.iter().map(CaseRecord::distance_km).collect();
    let avg_distance_km = RateCalculator::mean(&distances)
        .map(|d| RateCalculator::round_to(d, 1))
        .unwrap_or(0.0);

    DashboardStats {
        total_incidents: records.len(),
        total_stations: stations.len(),
        peak_month_incidents: peak_month_incidents(records),
        top_keyword: top_keyword(records).unwrap_or_else(|| UNKNOWN_KEYWORD.to_string()),
        avg_distance_km,
    }
}

/// Largest number of records reported in a single (year, month).
///
/// Records whose report timestamp does not parse are not counted.
pub fn peak_month_incidents(records: &[CaseRecord]) -> usize {
    let mut by_month: HashMap<(i32, u32), usize> = HashMap::new();
    for ts in records.iter().filter_map(CaseRecord::reported_at) {
        *by_month.entry((ts.year(), ts.month())).or_default() += 1;
    }
    by_month.into_values().max().unwrap_or(0)
}

/// Most frequent keyword; on ties the one encountered first wins.
pub fn top_keyword(records: &[CaseRecord]) -> Option<String> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for keyword in records.iter().flat_map(|r| r.keywords()) {
        let slot = *index.entry(keyword.as_str()).or_insert_with(|| {
            counts.push((keyword.as_str(), 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (keyword, count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((keyword, count));
        }
    }
    best.map(|(keyword, _)| keyword.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
