//! Hour-of-day and day-of-week incident histograms.

use chrono::Weekday;
use dashboard_core::models::CaseRecord;
use serde::Serialize;

/// Weekdays in dashboard order, Monday first.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// 0-23, serialized as its `"HH:00"` label.
    #[serde(serialize_with = "serialize_hour")]
    pub hour: u32,
    pub incidents: u32,
}

impl HourBucket {
    /// `"00:00"` .. `"23:00"`.
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    #[serde(serialize_with = "serialize_weekday")]
    pub day: Weekday,
    pub incidents: u32,
}

impl DayBucket {
    pub fn label(&self) -> &'static str {
        weekday_name(self.day)
    }
}

/// Both temporal histograms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalPatterns {
    pub peak_hours: [HourBucket; 24],
    pub day_of_week: [DayBucket; 7],
}

impl TemporalPatterns {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        Self {
            peak_hours: peak_hours(records),
            day_of_week: day_of_week_pattern(records),
        }
    }

    /// The busiest hour; the earliest one on ties. `None` when all are zero.
    pub fn busiest_hour(&self) -> Option<HourBucket> {
        busiest(&self.peak_hours, |b| b.incidents)
    }

    /// The busiest weekday; the earliest in the week on ties.
    pub fn busiest_day(&self) -> Option<DayBucket> {
        busiest(&self.day_of_week, |b| b.incidents)
    }
}

/// 24 hour buckets in order 00→23. Records whose start time does not parse
/// are skipped.
pub fn peak_hours(records: &[CaseRecord]) -> [HourBucket; 24] {
    let mut buckets: [HourBucket; 24] = std::array::from_fn(|i| HourBucket {
        hour: i as u32,
        incidents: 0,
    });
    for hour in records.iter().filter_map(CaseRecord::start_hour) {
        buckets[hour as usize].incidents += 1;
    }
    buckets
}

/// 7 day buckets in order Monday→Sunday. Unrecognised day names are skipped.
pub fn day_of_week_pattern(records: &[CaseRecord]) -> [DayBucket; 7] {
    let mut buckets = WEEK_ORDER.map(|day| DayBucket { day, incidents: 0 });
    for day in records.iter().filter_map(CaseRecord::weekday) {
        buckets[day.num_days_from_monday() as usize].incidents += 1;
    }
    buckets
}

fn busiest<T: Copy>(buckets: &[T], count: impl Fn(&T) -> u32) -> Option<T> {
    let mut best: Option<T> = None;
    for bucket in buckets {
        let c = count(bucket);
        if c > 0 && best.map(|b| c > count(&b)).unwrap_or(true) {
            best = Some(*bucket);
        }
    }
    best
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn serialize_hour<S: serde::Serializer>(hour: &u32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:02}:00", hour))
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
