//! Fixture builders shared by the unit tests of this crate.

use dashboard_core::models::{
    CaseRecord, FirDetails, IncidentDetails, PersonInvolved, PersonRole, PlaceOfOccurrence,
    VehicleInvolved, VehicleRole,
};

/// A record with only the required fields set.
pub fn record(fir_number: &str, station: &str, distance_km: f64) -> CaseRecord {
    CaseRecord {
        fir_details: FirDetails {
            fir_number: fir_number.to_string(),
            police_station: station.to_string(),
            ..Default::default()
        },
        incident_details: IncidentDetails {
            place_of_occurrence: PlaceOfOccurrence {
                distance_from_ps_km: distance_km,
                ..Default::default()
            },
            ..Default::default()
        },
        sections_applied: Vec::new(),
        persons_involved: Vec::new(),
        vehicles_involved: Vec::new(),
        narrative_summary: Default::default(),
        admin_details: Default::default(),
        source_pdf: None,
    }
}

pub fn person(role: PersonRole, name: &str, yob: i32) -> PersonInvolved {
    PersonInvolved {
        role,
        name: Some(name.to_string()),
        yob: Some(yob),
        ..Default::default()
    }
}

pub fn vehicle(role: VehicleRole, registration: Option<&str>) -> VehicleInvolved {
    VehicleInvolved {
        role,
        registration_number: registration.map(str::to_string),
        ..Default::default()
    }
}
