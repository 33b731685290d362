//! Zero-division-guarded arithmetic shared by every statistic.
//!
//! Every helper that divides returns `Option`; callers resolve `None` to a
//! defined default (usually 0) rather than surfacing an error.

// ── Constants ─────────────────────────────────────────────────────────────────

/// Year ages are computed against. The dataset covers 2024.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2024;

/// Stations further than this on average count as high-risk.
pub const HIGH_RISK_DISTANCE_KM: f64 = 20.0;

/// Length of the "top N" station rankings.
pub const TOP_STATIONS: usize = 5;

/// Label used when no keyword occurs anywhere in the dataset.
pub const UNKNOWN_KEYWORD: &str = "Unknown";

/// Caps of the three resource-priority components.
pub const PRIORITY_FATALITY_CAP: f64 = 50.0;
pub const PRIORITY_DISTANCE_CAP: f64 = 30.0;
pub const PRIORITY_WORKLOAD_CAP: f64 = 20.0;

// ── RateCalculator ────────────────────────────────────────────────────────────

/// Stateless collection of rounding and ratio helpers.
pub struct RateCalculator;

impl RateCalculator {
    /// Round `value` to `decimals` places, half away from zero.
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let factor = 10_f64.powi(decimals as i32);
        (value * factor).round() / factor
    }

    /// `numerator / denominator`, or `None` when the denominator is zero.
    pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
        if denominator == 0.0 {
            None
        } else {
            Some(numerator / denominator)
        }
    }

    /// Whole-number percentage `round(100 * part / whole)`, clamped to 100.
    ///
    /// Returns `None` when `whole` is zero.
    pub fn percentage(part: u64, whole: u64) -> Option<u32> {
        let r = Self::ratio(part as f64, whole as f64)?;
        Some((r * 100.0).round().clamp(0.0, 100.0) as u32)
    }

    /// Arithmetic mean, or `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let sum: f64 = values.iter().sum();
        Self::ratio(sum, values.len() as f64)
    }

    /// Weighted composite used to rank stations for resource allocation.
    ///
    /// Fatality share (≤50) + half the average distance (≤30) + a fifth of the
    /// incident count (≤20), rounded. `None` when `incidents` is zero.
    pub fn priority_score(fatalities: u32, incidents: u32, avg_distance_km: f64) -> Option<u32> {
        let fatality_share = Self::ratio(f64::from(fatalities), f64::from(incidents))?;
        let fatality_score = (fatality_share * PRIORITY_FATALITY_CAP).min(PRIORITY_FATALITY_CAP);
        let distance_score = (avg_distance_km / 2.0).min(PRIORITY_DISTANCE_CAP);
        let workload_score = (f64::from(incidents) / 5.0).min(PRIORITY_WORKLOAD_CAP);
        let total = fatality_score + distance_score + workload_score;
        Some(total.round().max(0.0) as u32)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
