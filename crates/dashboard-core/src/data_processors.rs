use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{DashboardError, Result};

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses report timestamps from the variety of formats found in FIR exports.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Parse a timestamp string. Naive values are taken as UTC.
    pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%d/%m/%Y %H:%M:%S",
            "%d/%m/%Y %H:%M",
            "%d-%m-%Y %H:%M:%S",
            "%d-%m-%Y %H:%M",
        ];
        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

        for fmt in FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        warn!(
            "TimestampProcessor: could not parse timestamp string \"{}\"",
            s
        );
        None
    }

    /// Parse a calendar date supplied by the operator (filter bounds).
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        let trimmed = s.trim();
        ["%Y-%m-%d", "%d/%m/%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .ok_or_else(|| DashboardError::TimestampParse(s.to_string()))
    }
}

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

fn time_of_day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d{1,2})[:.](\d{2})(?::\d{2})?\s*(am|pm)?\s*$")
            .expect("regex is valid")
    })
}

/// Parsing of the incident's time-of-day and weekday fields.
pub struct TimeOfDay;

impl TimeOfDay {
    /// Extract the hour (0-23) from `HH:MM`, `H:MM`, `HH:MM:SS` or a 12-hour
    /// `h:MM AM/PM` string.
    pub fn parse_hour(s: &str) -> Option<u32> {
        let caps = time_of_day_pattern().captures(s)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        if minute > 59 {
            debug!("TimeOfDay: minute out of range in \"{}\"", s);
            return None;
        }

        match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
            None if hour <= 23 => Some(hour),
            Some(ref meridiem) if (1..=12).contains(&hour) => {
                let base = hour % 12;
                Some(if meridiem == "pm" { base + 12 } else { base })
            }
            _ => {
                debug!("TimeOfDay: hour out of range in \"{}\"", s);
                None
            }
        }
    }

    /// Parse an English weekday name (full or three-letter, any case).
    pub fn parse_weekday(s: &str) -> Option<Weekday> {
        s.trim().parse::<Weekday>().ok()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
