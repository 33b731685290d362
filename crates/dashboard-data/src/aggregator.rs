//! Per-station aggregation and the station rankings derived from it.

use std::cmp::Ordering;
use std::collections::HashMap;

use dashboard_core::calculations::{RateCalculator, HIGH_RISK_DISTANCE_KM, TOP_STATIONS};
use dashboard_core::models::CaseRecord;
use serde::Serialize;

// ── StationTally ──────────────────────────────────────────────────────────────

/// Raw counts accumulated for one police station.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationTally {
    pub station: String,
    pub incidents: u32,
    /// Persons recorded as dead across all of the station's cases.
    pub fatalities: u32,
    /// Persons recorded as injured across all of the station's cases.
    pub injuries: u32,
    pub distances: Vec<f64>,
    pub hit_and_run_cases: u32,
    pub total_cases: u32,
}

impl StationTally {
    fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            ..Self::default()
        }
    }

    /// Accumulate `record` into the station's counts.
    fn add_record(&mut self, record: &CaseRecord) {
        self.incidents += 1;
        self.distances.push(record.distance_km());
        self.fatalities += record.fatalities();
        self.injuries += record.injuries();
        if record.is_hit_and_run() {
            self.hit_and_run_cases += 1;
        }
        self.total_cases += 1;
    }

    /// `round(100 * fatalities / incidents)`, clamped to 100.
    pub fn fatality_rate(&self) -> Option<u32> {
        RateCalculator::percentage(u64::from(self.fatalities), u64::from(self.incidents))
    }

    /// Mean distance from the station, rounded to one decimal.
    pub fn avg_distance_km(&self) -> Option<f64> {
        RateCalculator::mean(&self.distances).map(|d| RateCalculator::round_to(d, 1))
    }

    pub fn hit_and_run_rate(&self) -> Option<u32> {
        RateCalculator::percentage(
            u64::from(self.hit_and_run_cases),
            u64::from(self.total_cases),
        )
    }

    pub fn priority_score(&self) -> Option<u32> {
        let avg = RateCalculator::mean(&self.distances)?;
        RateCalculator::priority_score(self.fatalities, self.incidents, avg)
    }
}

// ── Ranking rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationFatalityRate {
    pub station: String,
    pub incidents: u32,
    pub fatalities: u32,
    pub fatality_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDistance {
    pub station: String,
    pub incidents: u32,
    pub avg_distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationHitAndRun {
    pub station: String,
    pub hit_and_run_rate: u32,
    pub total_cases: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighRiskStation {
    pub station: String,
    pub fatality_rate: u32,
    pub avg_distance_km: f64,
}

impl HighRiskStation {
    /// Ranking key: fatality rate plus average distance.
    pub fn risk_score(&self) -> f64 {
        f64::from(self.fatality_rate) + self.avg_distance_km
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPriority {
    pub station: String,
    pub priority_score: u32,
}

/// Every station ranking shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRankings {
    pub fatality_rates: Vec<StationFatalityRate>,
    pub response_distances: Vec<StationDistance>,
    pub hit_and_run: Vec<StationHitAndRun>,
    pub high_risk: Vec<HighRiskStation>,
    pub resource_priority: Vec<StationPriority>,
}

// ── StationAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups case records by police station.
pub struct StationAggregator;

impl StationAggregator {
    /// One pass over `records`, producing a tally per distinct station in the
    /// order stations are first seen.
    pub fn tally(records: &[CaseRecord]) -> Vec<StationTally> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut tallies: Vec<StationTally> = Vec::new();

        for record in records {
            let station = record.station_id();
            let slot = *index.entry(station).or_insert_with(|| {
                tallies.push(StationTally::new(station));
                tallies.len() - 1
            });
            tallies[slot].add_record(record);
        }

        tallies
    }

    /// Every station by fatality rate, highest first.
    pub fn fatality_rates(tallies: &[StationTally]) -> Vec<StationFatalityRate> {
        let mut rows: Vec<StationFatalityRate> = tallies
            .iter()
            .filter_map(|t| {
                Some(StationFatalityRate {
                    station: t.station.clone(),
                    incidents: t.incidents,
                    fatalities: t.fatalities,
                    fatality_rate: t.fatality_rate()?,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.fatality_rate.cmp(&a.fatality_rate));
        rows
    }

    /// Every station by average distance to the incident, furthest first.
    pub fn response_distances(tallies: &[StationTally]) -> Vec<StationDistance> {
        let mut rows: Vec<StationDistance> = tallies
            .iter()
            .filter_map(|t| {
                Some(StationDistance {
                    station: t.station.clone(),
                    incidents: t.incidents,
                    avg_distance_km: t.avg_distance_km()?,
                })
            })
            .collect();
        rows.sort_by(|a, b| descending(a.avg_distance_km, b.avg_distance_km));
        rows
    }

    /// Top stations by share of hit-and-run cases.
    pub fn hit_and_run_rates(tallies: &[StationTally]) -> Vec<StationHitAndRun> {
        let mut rows: Vec<StationHitAndRun> = tallies
            .iter()
            .filter_map(|t| {
                Some(StationHitAndRun {
                    station: t.station.clone(),
                    hit_and_run_rate: t.hit_and_run_rate()?,
                    total_cases: t.total_cases,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.hit_and_run_rate.cmp(&a.hit_and_run_rate));
        rows.truncate(TOP_STATIONS);
        rows
    }

    /// Top stations with any fatality or a long average distance, ranked by
    /// fatality rate plus average distance.
    pub fn high_risk(tallies: &[StationTally]) -> Vec<HighRiskStation> {
        let mut rows: Vec<HighRiskStation> = tallies
            .iter()
            .filter_map(|t| {
                Some(HighRiskStation {
                    station: t.station.clone(),
                    fatality_rate: t.fatality_rate()?,
                    avg_distance_km: t.avg_distance_km()?,
                })
            })
            .filter(|s| s.fatality_rate > 0 || s.avg_distance_km > HIGH_RISK_DISTANCE_KM)
            .collect();
        rows.sort_by(|a, b| descending(a.risk_score(), b.risk_score()));
        rows.truncate(TOP_STATIONS);
        rows
    }

    /// Top stations by composite resource-priority score.
    pub fn resource_priority(tallies: &[StationTally]) -> Vec<StationPriority> {
        let mut rows: Vec<StationPriority> = tallies
            .iter()
            .filter_map(|t| {
                Some(StationPriority {
                    station: t.station.clone(),
                    priority_score: t.priority_score()?,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        rows.truncate(TOP_STATIONS);
        rows
    }

    /// Tally `records` once and derive every ranking from the tallies.
    pub fn rankings(records: &[CaseRecord]) -> StationRankings {
        let tallies = Self::tally(records);
        Self::rankings_from_tallies(&tallies)
    }

    pub fn rankings_from_tallies(tallies: &[StationTally]) -> StationRankings {
        StationRankings {
            fatality_rates: Self::fatality_rates(tallies),
            response_distances: Self::response_distances(tallies),
            hit_and_run: Self::hit_and_run_rates(tallies),
            high_risk: Self::high_risk(tallies),
            resource_priority: Self::resource_priority(tallies),
        }
    }
}

/// Comparator for a stable highest-first sort on floats.
fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
