//! Main analysis pipeline for the FIR dashboard.
//!
//! Runs every aggregation over one record snapshot and returns an
//! [`AnalysisResult`] ready for rendering or JSON export.

use chrono::Utc;
use dashboard_core::calculations::DEFAULT_REFERENCE_YEAR;
use dashboard_core::models::CaseRecord;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{StationAggregator, StationRankings};
use crate::demographics::CaseComplexity;
use crate::summary::{summarize, DashboardStats};
use crate::temporal::TemporalPatterns;

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Year ages are computed against.
    pub reference_year: i32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    pub records_processed: usize,
    pub stations_seen: usize,
    /// Wall-clock seconds spent in the aggregations.
    pub compute_time_seconds: f64,
    pub reference_year: i32,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: DashboardStats,
    pub stations: StationRankings,
    pub temporal: TemporalPatterns,
    pub complexity: CaseComplexity,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Headline summary.
/// 2. Per-station tallies and the five rankings.
/// 3. Hour and weekday histograms.
/// 4. Case complexity and age groups at `config.reference_year`.
pub fn analyze(records: &[CaseRecord], config: &AnalysisConfig) -> AnalysisResult {
    let start = std::time::Instant::now();

    let summary = summarize(records);
    let tallies = StationAggregator::tally(records);
    let stations = StationAggregator::rankings_from_tallies(&tallies);
    let temporal = TemporalPatterns::from_records(records);
    let complexity = CaseComplexity::from_records(records, config.reference_year);

    let compute_time = start.elapsed().as_secs_f64();
    debug!(
        "Analysed {} records across {} stations in {:.3}s",
        records.len(),
        tallies.len(),
        compute_time
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_processed: records.len(),
        stations_seen: tallies.len(),
        compute_time_seconds: compute_time,
        reference_year: config.reference_year,
    };

    AnalysisResult {
        summary,
        stations,
        temporal,
        complexity,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{person, record, vehicle};
    use dashboard_core::models::{LifeStatus, PersonRole, VehicleRole};

    fn sample() -> Vec<CaseRecord> {
        let mut fatal = record("1", "Sanganer", 25.0);
        let mut victim = person(PersonRole::Victim, "Asha", 1990);
        victim.life_status = Some(LifeStatus::Dead);
        fatal.persons_involved.push(victim);
        fatal
            .vehicles_involved
            .push(vehicle(VehicleRole::AccusedVehicle, None));
        fatal.incident_details.start_time = Some("22:10".to_string());
        fatal.incident_details.day_of_week = Some("Saturday".to_string());
        fatal.fir_details.fir_timestamp = Some("2024-03-02T08:00:00".to_string());
        fatal.narrative_summary.keywords = vec!["accident".to_string()];

        let mut minor = record("2", "Sanganer", 5.0);
        minor.fir_details.fir_timestamp = Some("2024-03-09T08:00:00".to_string());
        minor.narrative_summary.keywords = vec!["theft".to_string(), "accident".to_string()];

        let other = record("3", "Adarsh Nagar", 2.0);

        vec![fatal, minor, other]
    }

    #[test]
    fn test_analyze_empty_records() {
        let result = analyze(&[], &AnalysisConfig::default());
        assert_eq!(result.summary.total_incidents, 0);
        assert!(result.stations.fatality_rates.is_empty());
        assert!(result.stations.resource_priority.is_empty());
        assert_eq!(result.temporal.peak_hours.len(), 24);
        assert_eq!(result.temporal.day_of_week.len(), 7);
        assert!(result.complexity.age_groups.is_empty());
        assert_eq!(result.metadata.records_processed, 0);
        assert_eq!(result.metadata.stations_seen, 0);
    }

    #[test]
    fn test_analyze_basic_pipeline() {
        let records = sample();
        let result = analyze(&records, &AnalysisConfig::default());

        assert_eq!(result.summary.total_incidents, 3);
        assert_eq!(result.summary.total_stations, 2);
        assert_eq!(result.summary.peak_month_incidents, 2);
        assert_eq!(result.summary.top_keyword, "accident");
        assert_eq!(result.stations.fatality_rates[0].station, "Sanganer");
        assert_eq!(result.stations.fatality_rates[0].fatality_rate, 50);
        assert_eq!(result.temporal.peak_hours[22].incidents, 1);
        assert_eq!(result.temporal.day_of_week[5].incidents, 1);
        assert_eq!(result.metadata.stations_seen, 2);
        assert_eq!(result.metadata.reference_year, DEFAULT_REFERENCE_YEAR);
    }

    #[test]
    fn test_station_incidents_sum_to_total() {
        let records = sample();
        let result = analyze(&records, &AnalysisConfig::default());
        let summed: u32 = result
            .stations
            .fatality_rates
            .iter()
            .map(|s| s.incidents)
            .sum();
        assert_eq!(summed as usize, result.summary.total_incidents);
    }

    #[test]
    fn test_reference_year_flows_into_age_groups() {
        let records = sample();
        let result = analyze(
            &records,
            &AnalysisConfig {
                reference_year: 2060,
            },
        );
        assert_eq!(result.metadata.reference_year, 2060);
        assert_eq!(result.complexity.age_groups[0].range.label(), "60+");
    }

    #[test]
    fn test_metadata_fields_populated() {
        let result = analyze(&sample(), &AnalysisConfig::default());
        assert!(!result.metadata.generated_at.is_empty());
        assert!(result.metadata.compute_time_seconds >= 0.0);
        assert_eq!(result.metadata.records_processed, 3);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = analyze(&sample(), &AnalysisConfig::default());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["summary"]["total_incidents"], 3);
        assert_eq!(value["temporal"]["day_of_week"][0]["day"], "Monday");
        assert!(value["stations"]["high_risk"].is_array());
    }
}
