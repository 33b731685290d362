//! Case-complexity ratios and the age-group histogram.

use dashboard_core::calculations::RateCalculator;
use dashboard_core::models::CaseRecord;
use serde::Serialize;

// ── AgeGroup ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "Under 18")]
    Under18,
    #[serde(rename = "18-29")]
    From18To29,
    #[serde(rename = "30-44")]
    From30To44,
    #[serde(rename = "45-59")]
    From45To59,
    #[serde(rename = "60+")]
    Over60,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Under18,
        AgeGroup::From18To29,
        AgeGroup::From30To44,
        AgeGroup::From45To59,
        AgeGroup::Over60,
    ];

    pub fn for_age(age: i32) -> Self {
        match age {
            i32::MIN..=17 => AgeGroup::Under18,
            18..=29 => AgeGroup::From18To29,
            30..=44 => AgeGroup::From30To44,
            45..=59 => AgeGroup::From45To59,
            _ => AgeGroup::Over60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::From18To29 => "18-29",
            AgeGroup::From30To44 => "30-44",
            AgeGroup::From45To59 => "45-59",
            AgeGroup::Over60 => "60+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeGroupCount {
    pub range: AgeGroup,
    pub count: u32,
}

// ── CaseComplexity ────────────────────────────────────────────────────────────

/// Whole-dataset case-complexity and demographic figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseComplexity {
    pub avg_people_per_case: f64,
    pub unknown_suspect_rate: u32,
    pub multi_vehicle_rate: u32,
    /// Non-empty age groups, largest first.
    pub age_groups: Vec<AgeGroupCount>,
}

impl CaseComplexity {
    /// Every ratio falls back to 0 for an empty `records`.
    pub fn from_records(records: &[CaseRecord], reference_year: i32) -> Self {
        let total = records.len() as u64;

        let total_people: usize = records.iter().map(|r| r.persons_involved.len()).sum();
        let avg_people_per_case = RateCalculator::ratio(total_people as f64, total as f64)
            .map(|v| RateCalculator::round_to(v, 1))
            .unwrap_or(0.0);

        let unnamed = records.iter().filter(|r| r.has_unnamed_accused()).count() as u64;
        let multi_vehicle = records
            .iter()
            .filter(|r| r.vehicles_involved.len() > 1)
            .count() as u64;

        Self {
            avg_people_per_case,
            unknown_suspect_rate: RateCalculator::percentage(unnamed, total).unwrap_or(0),
            multi_vehicle_rate: RateCalculator::percentage(multi_vehicle, total).unwrap_or(0),
            age_groups: age_histogram(records, reference_year),
        }
    }
}

/// Persons with a known birth year bucketed by age at `reference_year`.
///
/// Empty groups are omitted; the rest are sorted by count descending, ties in
/// the order the group was first encountered.
pub fn age_histogram(records: &[CaseRecord], reference_year: i32) -> Vec<AgeGroupCount> {
    let mut groups: Vec<AgeGroupCount> = Vec::new();

    let ages = records
        .iter()
        .flat_map(|r| r.persons_involved.iter())
        .filter_map(|p| p.birth_year())
        .map(|yob| reference_year - yob);

    for age in ages {
        let range = AgeGroup::for_age(age);
        match groups.iter_mut().find(|g| g.range == range) {
            Some(group) => group.count += 1,
            None => groups.push(AgeGroupCount { range, count: 1 }),
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{person, record, vehicle};
    use dashboard_core::models::{PersonRole, VehicleRole};

    const YEAR: i32 = 2024;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::for_age(0), AgeGroup::Under18);
        assert_eq!(AgeGroup::for_age(17), AgeGroup::Under18);
        assert_eq!(AgeGroup::for_age(18), AgeGroup::From18To29);
        assert_eq!(AgeGroup::for_age(29), AgeGroup::From18To29);
        assert_eq!(AgeGroup::for_age(30), AgeGroup::From30To44);
        assert_eq!(AgeGroup::for_age(44), AgeGroup::From30To44);
        assert_eq!(AgeGroup::for_age(45), AgeGroup::From45To59);
        assert_eq!(AgeGroup::for_age(59), AgeGroup::From45To59);
        assert_eq!(AgeGroup::for_age(60), AgeGroup::Over60);
        assert_eq!(AgeGroup::for_age(-3), AgeGroup::Under18);
    }

    #[test]
    fn test_twenty_five_year_old_is_18_to_29() {
        let mut r = record("1", "A", 1.0);
        r.persons_involved
            .push(person(PersonRole::Victim, "V", YEAR - 25));
        let groups = age_histogram(&[r], YEAR);
        assert_eq!(
            groups,
            vec![AgeGroupCount {
                range: AgeGroup::From18To29,
                count: 1
            }]
        );
    }

    #[test]
    fn test_unknown_birth_year_excluded() {
        let mut r = record("1", "A", 1.0);
        r.persons_involved.push(person(PersonRole::Victim, "V", 0));
        r.persons_involved.push(person(PersonRole::Witness, "W", -1));
        let mut no_yob = person(PersonRole::Witness, "X", 0);
        no_yob.yob = None;
        r.persons_involved.push(no_yob);
        assert!(age_histogram(&[r], YEAR).is_empty());
    }

    #[test]
    fn test_age_histogram_sorted_by_count() {
        let mut r = record("1", "A", 1.0);
        r.persons_involved
            .push(person(PersonRole::Victim, "a", YEAR - 70));
        r.persons_involved
            .push(person(PersonRole::Victim, "b", YEAR - 35));
        r.persons_involved
            .push(person(PersonRole::Victim, "c", YEAR - 40));
        r.persons_involved
            .push(person(PersonRole::Victim, "d", YEAR - 10));

        let groups = age_histogram(&[r], YEAR);
        let ranges: Vec<AgeGroup> = groups.iter().map(|g| g.range).collect();
        assert_eq!(
            ranges,
            vec![AgeGroup::From30To44, AgeGroup::Over60, AgeGroup::Under18]
        );
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn test_reference_year_shifts_buckets() {
        let mut r = record("1", "A", 1.0);
        r.persons_involved
            .push(person(PersonRole::Victim, "V", 2000));
        assert_eq!(age_histogram(&[r.clone()], 2024)[0].range, AgeGroup::From18To29);
        assert_eq!(age_histogram(&[r], 2040)[0].range, AgeGroup::From30To44);
    }

    #[test]
    fn test_case_complexity_empty_input() {
        let c = CaseComplexity::from_records(&[], YEAR);
        assert_eq!(c.avg_people_per_case, 0.0);
        assert_eq!(c.unknown_suspect_rate, 0);
        assert_eq!(c.multi_vehicle_rate, 0);
        assert!(c.age_groups.is_empty());
    }

    #[test]
    fn test_case_complexity_ratios() {
        let mut first = record("1", "A", 1.0);
        first
            .persons_involved
            .push(person(PersonRole::Accused, "Unknown male", 0));
        first
            .persons_involved
            .push(person(PersonRole::Complainant, "Meena", 1985));
        first
            .vehicles_involved
            .push(vehicle(VehicleRole::AccusedVehicle, None));
        first
            .vehicles_involved
            .push(vehicle(VehicleRole::WitnessVehicle, Some("RJ01")));

        let mut second = record("2", "A", 1.0);
        second
            .persons_involved
            .push(person(PersonRole::Accused, "Ravi", 1990));

        let third = record("3", "B", 1.0);

        let c = CaseComplexity::from_records(&[first, second, third], YEAR);
        // 3 people / 3 cases
        assert_eq!(c.avg_people_per_case, 1.0);
        assert_eq!(c.unknown_suspect_rate, 33);
        assert_eq!(c.multi_vehicle_rate, 33);
    }

    #[test]
    fn test_unnamed_accused_counts_record_once() {
        let mut r = record("1", "A", 1.0);
        r.persons_involved
            .push(person(PersonRole::Accused, "Unknown 1", 0));
        r.persons_involved
            .push(person(PersonRole::Accused, "Unknown 2", 0));
        let c = CaseComplexity::from_records(&[r], YEAR);
        assert_eq!(c.unknown_suspect_rate, 100);
    }

    #[test]
    fn test_age_group_serializes_label() {
        let value = serde_json::to_value(AgeGroupCount {
            range: AgeGroup::Over60,
            count: 2,
        })
        .unwrap();
        assert_eq!(value["range"], "60+");
        for group in AgeGroup::ALL {
            assert_eq!(serde_json::to_value(group).unwrap(), group.label());
        }
    }
}
