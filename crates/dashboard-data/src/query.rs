//! Record selection: station/keyword/date filters, free-text search and the
//! per-record derivations used by map and case-list consumers.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use dashboard_core::models::{CaseRecord, Severity};
use regex::RegexBuilder;
use serde::Serialize;
use tracing::debug;

// ── Distinct values ───────────────────────────────────────────────────────────

/// Sorted distinct station names.
pub fn unique_stations(records: &[CaseRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.station_id().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct keywords.
pub fn unique_keywords(records: &[CaseRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.keywords().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Values an operator can pick from when narrowing the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub stations: Vec<String>,
    pub keywords: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        Self {
            stations: unique_stations(records),
            keywords: unique_keywords(records),
        }
    }
}

// ── RecordFilter ──────────────────────────────────────────────────────────────

/// Operator-selected narrowing of the record set. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub station: Option<String>,
    pub keyword: Option<String>,
    /// Inclusive lower bound on the report date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the report date.
    pub to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.station.is_none() && self.keyword.is_none() && self.from.is_none() && self.to.is_none()
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(station) = &self.station {
            if record.station_id() != station {
                return false;
            }
        }

        if let Some(keyword) = &self.keyword {
            if !record.keywords().iter().any(|k| k == keyword) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = record.reported_at().map(|ts| ts.date_naive()) else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    /// Matching records, cloned, in input order.
    pub fn apply(&self, records: &[CaseRecord]) -> Vec<CaseRecord> {
        let selected: Vec<CaseRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        debug!(
            "Filter kept {} of {} records",
            selected.len(),
            records.len()
        );
        selected
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Case-insensitive substring search over FIR number, address, person names
/// and registration numbers. Results are ordered by numeric FIR number
/// (non-numeric numbers sort as 0); a blank query returns every record.
pub fn search<'a>(records: &'a [CaseRecord], query: &str) -> Vec<&'a CaseRecord> {
    let query = query.trim();
    let mut hits: Vec<&CaseRecord> = if query.is_empty() {
        records.iter().collect()
    } else {
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build();
        match pattern {
            Ok(re) => records
                .iter()
                .filter(|r| re.is_match(&searchable_text(r)))
                .collect(),
            Err(e) => {
                debug!("Search pattern rejected: {}", e);
                Vec::new()
            }
        }
    };

    hits.sort_by_key(|r| fir_sort_key(r));
    hits
}

fn searchable_text(record: &CaseRecord) -> String {
    let names: Vec<&str> = record
        .persons_involved
        .iter()
        .filter_map(|p| p.name.as_deref())
        .collect();
    let registrations: Vec<&str> = record
        .vehicles_involved
        .iter()
        .filter_map(|v| v.registration_number.as_deref())
        .collect();

    [
        record.fir_details.fir_number.as_str(),
        record
            .incident_details
            .place_of_occurrence
            .address
            .as_deref()
            .unwrap_or(""),
        &names.join(" "),
        &registrations.join(" "),
    ]
    .join(" ")
}

/// Numeric value of the FIR number's leading digit run (`"0142/2024"` sorts
/// as 142). Numbers without leading digits sort as 0.
fn fir_sort_key(record: &CaseRecord) -> u64 {
    let fir = record.fir_details.fir_number.trim_start();
    let end = fir
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(fir.len());
    fir[..end].parse().unwrap_or(0)
}

// ── Map derivations ───────────────────────────────────────────────────────────

/// One weighted point of the incident heat map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

/// Base intensity from severity plus 0.2 per person involved (at most +1).
pub fn heat_intensity(record: &CaseRecord) -> f64 {
    let base = match record.severity() {
        Severity::High => 3.0,
        Severity::Medium => 2.0,
        Severity::Low => 1.0,
    };
    base + (record.persons_involved.len() as f64 * 0.2).min(1.0)
}

/// Heat-map points for every record with a known location.
pub fn heat_points(records: &[CaseRecord]) -> Vec<HeatPoint> {
    records
        .iter()
        .filter_map(|r| {
            let (lat, lng) = r.location()?;
            Some(HeatPoint {
                lat,
                lng,
                intensity: heat_intensity(r),
            })
        })
        .collect()
}

/// Mean position of the located records, `None` when there are none.
pub fn map_center(records: &[CaseRecord]) -> Option<(f64, f64)> {
    let located: Vec<(f64, f64)> = records.iter().filter_map(CaseRecord::location).collect();
    if located.is_empty() {
        return None;
    }
    let n = located.len() as f64;
    let lat = located.iter().map(|(lat, _)| lat).sum::<f64>() / n;
    let lng = located.iter().map(|(_, lng)| lng).sum::<f64>() / n;
    Some((lat, lng))
}

/// Heat-map points together with the position the map centres on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub center: Option<(f64, f64)>,
    pub points: Vec<HeatPoint>,
}

impl MapLayer {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        let points = heat_points(records);
        debug!(
            "{} of {} records have a known location",
            points.len(),
            records.len()
        );
        Self {
            center: map_center(records),
            points,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
