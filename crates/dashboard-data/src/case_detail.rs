//! Single-case view: lookup by FIR number and the figures shown next to the
//! raw record.

use dashboard_core::models::{
    CaseRecord, InjuryStatus, LifeStatus, PersonInvolved, PersonRole, SectionApplied, Severity,
    VehicleInvolved,
};
use serde::Serialize;
use tracing::debug;

/// The record whose FIR number equals `fir_number` exactly, first one wins.
pub fn find_case<'a>(records: &'a [CaseRecord], fir_number: &str) -> Option<&'a CaseRecord> {
    let found = records
        .iter()
        .find(|r| r.fir_details.fir_number == fir_number);
    if found.is_none() {
        debug!("No case with FIR number {:?}", fir_number);
    }
    found
}

// ── IncidentType ──────────────────────────────────────────────────────────────

/// Coarse incident category derived from the narrative keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentType {
    Accident,
    Theft,
    Violence,
    Other,
}

impl IncidentType {
    /// First matching category in the order accident, theft, violence.
    /// Keywords match by case-insensitive substring.
    pub fn from_keywords(keywords: &[String]) -> Self {
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let any = |needles: &[&str]| {
            lowered
                .iter()
                .any(|k| needles.iter().any(|needle| k.contains(needle)))
        };

        if any(&["accident", "collision"]) {
            IncidentType::Accident
        } else if any(&["theft", "robbery"]) {
            IncidentType::Theft
        } else if any(&["assault", "violence"]) {
            IncidentType::Violence
        } else {
            IncidentType::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Accident => "Accident",
            IncidentType::Theft => "Theft",
            IncidentType::Violence => "Violence",
            IncidentType::Other => "Other",
        }
    }
}

// ── PersonDetail ──────────────────────────────────────────────────────────────

/// One de-duplicated person of a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonDetail {
    pub name: Option<String>,
    pub role: PersonRole,
    /// Age at the reference year; `None` for unknown or future birth years.
    pub age: Option<i32>,
    pub deceased: bool,
    pub injured: bool,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
}

impl PersonDetail {
    fn new(person: &PersonInvolved, reference_year: i32) -> Self {
        Self {
            name: person.name.clone(),
            role: person.role.clone(),
            age: age_at(person, reference_year),
            deceased: person.is_dead(),
            injured: person.is_injured(),
            mobile_number: person.mobile_number.clone(),
            address: person.address.clone(),
        }
    }
}

fn age_at(person: &PersonInvolved, reference_year: i32) -> Option<i32> {
    person
        .birth_year()
        .filter(|yob| *yob <= reference_year)
        .map(|yob| reference_year - yob)
}

/// Collapse entries sharing a name into the first one, filling its missing
/// role, statuses and contact details from the later ones.
fn merge_by_name(persons: &[PersonInvolved]) -> Vec<PersonInvolved> {
    let mut merged: Vec<PersonInvolved> = Vec::with_capacity(persons.len());

    for person in persons {
        let Some(index) = merged.iter().position(|p| p.name == person.name) else {
            merged.push(person.clone());
            continue;
        };
        let existing = &mut merged[index];
        if existing.role == PersonRole::Unknown {
            existing.role = person.role.clone();
        }
        fill(&mut existing.injury_status, &person.injury_status);
        fill(&mut existing.life_status, &person.life_status);
        fill(&mut existing.mobile_number, &person.mobile_number);
        fill(&mut existing.address, &person.address);
    }

    merged
}

fn fill<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(other);
    }
}

// ── CaseDetail ────────────────────────────────────────────────────────────────

/// Everything the detail view shows for one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseDetail {
    pub fir_number: String,
    pub police_station: String,
    pub severity: Severity,
    pub incident_type: IncidentType,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub day_of_week: Option<String>,
    pub address: Option<String>,
    pub distance_km: f64,
    pub location: Option<(f64, f64)>,
    /// Distinct people after merging repeated names.
    pub people: usize,
    pub complainants: Vec<PersonDetail>,
    pub accused: Vec<PersonDetail>,
    pub victims: Vec<PersonDetail>,
    /// Witnesses plus everyone whose role is missing or unrecognised.
    pub witnesses: Vec<PersonDetail>,
    pub deceased: usize,
    pub injured: usize,
    pub vehicles: Vec<VehicleInvolved>,
    pub sections: Vec<SectionApplied>,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
}

impl CaseDetail {
    pub fn from_record(record: &CaseRecord, reference_year: i32) -> Self {
        let persons = merge_by_name(&record.persons_involved);

        let mut complainants = Vec::new();
        let mut accused = Vec::new();
        let mut victims = Vec::new();
        let mut witnesses = Vec::new();
        for person in &persons {
            let detail = PersonDetail::new(person, reference_year);
            match person.role {
                PersonRole::Complainant => complainants.push(detail),
                PersonRole::Accused => accused.push(detail),
                PersonRole::Victim => victims.push(detail),
                PersonRole::Witness | PersonRole::Unknown | PersonRole::Other(_) => {
                    witnesses.push(detail)
                }
            }
        }

        let deceased = persons
            .iter()
            .filter(|p| p.life_status == Some(LifeStatus::Dead))
            .count();
        let injured = persons
            .iter()
            .filter(|p| p.injury_status == Some(InjuryStatus::Injured))
            .count();

        let incident = &record.incident_details;
        Self {
            fir_number: record.fir_details.fir_number.clone(),
            police_station: record.station_id().to_string(),
            severity: record.severity(),
            incident_type: IncidentType::from_keywords(record.keywords()),
            start_date: incident.start_date.clone(),
            start_time: incident.start_time.clone(),
            day_of_week: incident.day_of_week.clone(),
            address: incident.place_of_occurrence.address.clone(),
            distance_km: record.distance_km(),
            location: record.location(),
            people: persons.len(),
            complainants,
            accused,
            victims,
            witnesses,
            deceased,
            injured,
            vehicles: record.vehicles_involved.clone(),
            sections: record.sections_applied.clone(),
            summary: record.narrative_summary.summary_en.clone(),
            keywords: record.keywords().to_vec(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
