use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::data_processors::{TimeOfDay, TimestampProcessor};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric value of a JSON number or numeric string; anything else is `None`.
fn lenient_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Optional float field where a malformed value means unknown.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_number))
}

/// Optional whole-number field; `1985.0` and `"1985"` are accepted, anything
/// else that is not a whole number in range means unknown.
fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(lenient_number)
        .filter(|n| n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
        .map(|n| n as i32))
}

// ── Enumerations ──────────────────────────────────────────────────────────────

/// Role a person plays in a case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PersonRole {
    Complainant,
    Accused,
    Victim,
    Witness,
    /// Role missing from the report.
    #[default]
    Unknown,
    /// Any role label not covered above, kept verbatim.
    Other(String),
}

impl PersonRole {
    pub fn as_str(&self) -> &str {
        match self {
            PersonRole::Complainant => "Complainant",
            PersonRole::Accused => "Accused",
            PersonRole::Victim => "Victim",
            PersonRole::Witness => "Witness",
            PersonRole::Unknown => "Unknown",
            PersonRole::Other(s) => s,
        }
    }
}

impl From<Option<String>> for PersonRole {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("Unknown") => PersonRole::Unknown,
            Some("Complainant") => PersonRole::Complainant,
            Some("Accused") => PersonRole::Accused,
            Some("Victim") => PersonRole::Victim,
            Some("Witness") => PersonRole::Witness,
            Some(other) => PersonRole::Other(other.to_string()),
        }
    }
}

impl From<PersonRole> for String {
    fn from(role: PersonRole) -> Self {
        role.as_str().to_string()
    }
}

/// Injury status recorded for a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InjuryStatus {
    Injured,
    Other(String),
}

impl From<String> for InjuryStatus {
    fn from(value: String) -> Self {
        if value.trim() == "Injured" {
            InjuryStatus::Injured
        } else {
            InjuryStatus::Other(value)
        }
    }
}

impl From<InjuryStatus> for String {
    fn from(status: InjuryStatus) -> Self {
        match status {
            InjuryStatus::Injured => "Injured".to_string(),
            InjuryStatus::Other(s) => s,
        }
    }
}

/// Life status recorded for a person (the `status` field in the dataset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifeStatus {
    Dead,
    Other(String),
}

impl From<String> for LifeStatus {
    fn from(value: String) -> Self {
        if value.trim() == "Dead" {
            LifeStatus::Dead
        } else {
            LifeStatus::Other(value)
        }
    }
}

impl From<LifeStatus> for String {
    fn from(status: LifeStatus) -> Self {
        match status {
            LifeStatus::Dead => "Dead".to_string(),
            LifeStatus::Other(s) => s,
        }
    }
}

/// Role a vehicle plays in a case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum VehicleRole {
    AccusedVehicle,
    WitnessVehicle,
    #[default]
    Unknown,
    Other(String),
}

impl VehicleRole {
    pub fn as_str(&self) -> &str {
        match self {
            VehicleRole::AccusedVehicle => "Accused Vehicle",
            VehicleRole::WitnessVehicle => "Witness Vehicle",
            VehicleRole::Unknown => "Unknown",
            VehicleRole::Other(s) => s,
        }
    }
}

impl From<Option<String>> for VehicleRole {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("Unknown") => VehicleRole::Unknown,
            Some("Accused Vehicle") => VehicleRole::AccusedVehicle,
            Some("Witness Vehicle") => VehicleRole::WitnessVehicle,
            Some(other) => VehicleRole::Other(other.to_string()),
        }
    }
}

impl From<VehicleRole> for String {
    fn from(role: VehicleRole) -> Self {
        role.as_str().to_string()
    }
}

/// Coarse severity of a case, used for map intensity and case listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

// ── Record sections ───────────────────────────────────────────────────────────

/// Registration details of the report itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fir_number: String,
    /// Reporting station; the grouping key for every per-station statistic.
    pub police_station: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: Option<i32>,
    /// When the report was registered (`reportedAt`).
    #[serde(default)]
    pub fir_timestamp: Option<String>,
    #[serde(default)]
    pub information_type: Option<String>,
}

/// Where the incident took place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOfOccurrence {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "directionFromPS", default)]
    pub direction_from_ps: Option<String>,
    #[serde(rename = "distanceFromPS_km")]
    pub distance_from_ps_km: f64,
    /// `None` or `0.0` means the location is unknown.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

/// When and where the incident happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetails {
    #[serde(default)]
    pub start_date: Option<String>,
    /// Time of day, `HH:MM`.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    pub place_of_occurrence: PlaceOfOccurrence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionApplied {
    #[serde(default, deserialize_with = "null_as_default")]
    pub act: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section: String,
}

/// A person named in the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInvolved {
    #[serde(default)]
    pub role: PersonRole,
    #[serde(default)]
    pub name: Option<String>,
    /// Year of birth; `<= 0` or missing means unknown.
    #[serde(default, deserialize_with = "lenient_i32")]
    pub yob: Option<i32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub injury_status: Option<InjuryStatus>,
    #[serde(rename = "status", default)]
    pub life_status: Option<LifeStatus>,
}

impl PersonInvolved {
    pub fn is_dead(&self) -> bool {
        matches!(self.life_status, Some(LifeStatus::Dead))
    }

    pub fn is_injured(&self) -> bool {
        matches!(self.injury_status, Some(InjuryStatus::Injured))
    }

    /// Year of birth when it is known (strictly positive).
    pub fn birth_year(&self) -> Option<i32> {
        self.yob.filter(|y| *y > 0)
    }

    /// An accused whose name carries the literal marker `Unknown`.
    pub fn is_unnamed_accused(&self) -> bool {
        self.role == PersonRole::Accused
            && self
                .name
                .as_deref()
                .map(|n| n.contains("Unknown"))
                .unwrap_or(false)
    }
}

/// A vehicle named in the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInvolved {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub role: VehicleRole,
}

impl VehicleInvolved {
    /// Missing, null and blank registration numbers all count as unregistered.
    pub fn is_unregistered(&self) -> bool {
        self.registration_number
            .as_deref()
            .map(|r| r.trim().is_empty())
            .unwrap_or(true)
    }

    /// An accused vehicle with no registration: the hit-and-run signature.
    pub fn is_fleeing(&self) -> bool {
        self.role == VehicleRole::AccusedVehicle && self.is_unregistered()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrativeSummary {
    #[serde(default)]
    pub summary_en: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDetails {
    #[serde(default)]
    pub gd_entry_number: Option<String>,
    #[serde(default)]
    pub gd_timestamp: Option<String>,
    #[serde(default)]
    pub officer_in_charge: Option<String>,
    #[serde(default)]
    pub investigating_officer: Option<String>,
}

// ── CaseRecord ────────────────────────────────────────────────────────────────

/// One First Information Report as stored in the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub fir_details: FirDetails,
    pub incident_details: IncidentDetails,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections_applied: Vec<SectionApplied>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub persons_involved: Vec<PersonInvolved>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vehicles_involved: Vec<VehicleInvolved>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub narrative_summary: NarrativeSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_details: AdminDetails,
    #[serde(rename = "source_pdf", default)]
    pub source_pdf: Option<String>,
}

impl CaseRecord {
    pub fn station_id(&self) -> &str {
        &self.fir_details.police_station
    }

    pub fn distance_km(&self) -> f64 {
        self.incident_details.place_of_occurrence.distance_from_ps_km
    }

    /// `(latitude, longitude)` when both are present and non-zero.
    pub fn location(&self) -> Option<(f64, f64)> {
        let place = &self.incident_details.place_of_occurrence;
        match (place.latitude, place.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.narrative_summary.keywords
    }

    /// Registration timestamp, when it parses.
    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        self.fir_details
            .fir_timestamp
            .as_deref()
            .and_then(TimestampProcessor::parse_str)
    }

    /// Hour of day (0-23) the incident started, when it parses.
    pub fn start_hour(&self) -> Option<u32> {
        self.incident_details
            .start_time
            .as_deref()
            .and_then(TimeOfDay::parse_hour)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.incident_details
            .day_of_week
            .as_deref()
            .and_then(TimeOfDay::parse_weekday)
    }

    pub fn fatalities(&self) -> u32 {
        self.persons_involved.iter().filter(|p| p.is_dead()).count() as u32
    }

    pub fn injuries(&self) -> u32 {
        self.persons_involved
            .iter()
            .filter(|p| p.is_injured())
            .count() as u32
    }

    pub fn is_hit_and_run(&self) -> bool {
        self.vehicles_involved.iter().any(VehicleInvolved::is_fleeing)
    }

    pub fn has_unnamed_accused(&self) -> bool {
        self.persons_involved
            .iter()
            .any(PersonInvolved::is_unnamed_accused)
    }

    /// High when anyone died, Medium when anyone was injured, Low otherwise.
    pub fn severity(&self) -> Severity {
        if self.persons_involved.iter().any(PersonInvolved::is_dead) {
            Severity::High
        } else if self.persons_involved.iter().any(PersonInvolved::is_injured) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
