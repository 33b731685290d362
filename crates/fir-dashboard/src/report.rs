use dashboard_core::formatting::{
    format_count, format_distance, format_number, format_percent, render_bar,
};
use dashboard_core::models::{CaseRecord, PersonRole};
use dashboard_data::aggregator::StationRankings;
use dashboard_data::analysis::AnalysisResult;
use dashboard_data::case_detail::{CaseDetail, PersonDetail};
use dashboard_data::demographics::CaseComplexity;
use dashboard_data::query::{FilterOptions, MapLayer};
use dashboard_data::summary::DashboardStats;
use dashboard_data::temporal::TemporalPatterns;
use serde_json::{json, Value};

/// Width of histogram bars in the text report.
const BAR_WIDTH: usize = 30;

// ── View ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Summary,
    Stations,
    Temporal,
    Demographics,
    Cases,
    Map,
    Options,
    All,
}

impl View {
    /// Unknown names fall back to [`View::All`].
    pub fn parse(name: &str) -> Self {
        match name {
            "summary" => View::Summary,
            "stations" => View::Stations,
            "temporal" => View::Temporal,
            "demographics" => View::Demographics,
            "cases" => View::Cases,
            "map" => View::Map,
            "options" => View::Options,
            _ => View::All,
        }
    }

    fn includes(self, section: View) -> bool {
        self == View::All || self == section
    }
}

// ── Report input ───────────────────────────────────────────────────────────────

/// Everything the views draw from.
pub struct Report<'a> {
    pub result: &'a AnalysisResult,
    /// Search matches, listed by the cases view.
    pub cases: &'a [&'a CaseRecord],
    pub map: &'a MapLayer,
    pub options: &'a FilterOptions,
    /// Most cases or map points listed in text output.
    pub limit: usize,
    pub warning: Option<&'a str>,
}

// ── Text rendering ─────────────────────────────────────────────────────────────

/// Plain-text report for `view`. The map, options and cases views are never
/// part of `all`.
pub fn render_text(view: View, report: &Report) -> String {
    let result = report.result;
    let mut sections: Vec<String> = Vec::new();

    if let Some(w) = report.warning {
        sections.push(format!("WARNING: {}", w));
    }
    if view.includes(View::Summary) {
        sections.push(render_summary(&result.summary));
    }
    if view.includes(View::Stations) {
        sections.push(render_stations(&result.stations));
    }
    if view.includes(View::Temporal) {
        sections.push(render_temporal(&result.temporal));
    }
    if view.includes(View::Demographics) {
        sections.push(render_demographics(&result.complexity));
    }
    match view {
        View::Cases => sections.push(render_cases(report.cases, report.limit)),
        View::Map => sections.push(render_map(report.map, report.limit)),
        View::Options => sections.push(render_options(report.options)),
        _ => {}
    }

    finish(sections)
}

fn finish(sections: Vec<String>) -> String {
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

fn heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}

fn row(label: &str, value: impl AsRef<str>) -> String {
    format!("  {:<24}{}", label, value.as_ref())
}

pub fn render_summary(stats: &DashboardStats) -> String {
    [
        heading("Dashboard summary"),
        row("Total incidents", format_count(stats.total_incidents as u64)),
        row("Police stations", format_count(stats.total_stations as u64)),
        row(
            "Peak month",
            format!("{} incidents", format_count(stats.peak_month_incidents as u64)),
        ),
        row("Top keyword", &stats.top_keyword),
        row("Avg distance", format_distance(stats.avg_distance_km)),
    ]
    .join("\n")
}

pub fn render_stations(rankings: &StationRankings) -> String {
    let mut lines = vec![heading("Station rankings")];

    lines.push(String::new());
    lines.push("Fatality rate".to_string());
    for s in &rankings.fatality_rates {
        lines.push(format!(
            "  {:<28}{:>6}  ({} of {} cases)",
            s.station,
            format_percent(s.fatality_rate),
            s.fatalities,
            s.incidents
        ));
    }

    lines.push(String::new());
    lines.push("Average response distance".to_string());
    for s in &rankings.response_distances {
        lines.push(format!(
            "  {:<28}{:>10}  ({} cases)",
            s.station,
            format_distance(s.avg_distance_km),
            s.incidents
        ));
    }

    lines.push(String::new());
    lines.push("Hit-and-run rate (top 5)".to_string());
    for s in &rankings.hit_and_run {
        lines.push(format!(
            "  {:<28}{:>6}  ({} cases)",
            s.station,
            format_percent(s.hit_and_run_rate),
            s.total_cases
        ));
    }

    lines.push(String::new());
    lines.push("High-risk stations (top 5)".to_string());
    if rankings.high_risk.is_empty() {
        lines.push("  none".to_string());
    }
    for s in &rankings.high_risk {
        lines.push(format!(
            "  {:<28}{:>6}  {:>10}",
            s.station,
            format_percent(s.fatality_rate),
            format_distance(s.avg_distance_km)
        ));
    }

    lines.push(String::new());
    lines.push("Resource priority (top 5)".to_string());
    for s in &rankings.resource_priority {
        lines.push(format!("  {:<28}{:>6}", s.station, s.priority_score));
    }

    lines.join("\n")
}

pub fn render_temporal(patterns: &TemporalPatterns) -> String {
    let mut lines = vec![heading("Temporal patterns")];

    let hour_max = patterns
        .peak_hours
        .iter()
        .map(|b| u64::from(b.incidents))
        .max()
        .unwrap_or(0);
    lines.push(String::new());
    lines.push("Incidents by hour".to_string());
    for b in &patterns.peak_hours {
        lines.push(format!(
            "  {}  {:>5}  {}",
            b.label(),
            b.incidents,
            render_bar(u64::from(b.incidents), hour_max, BAR_WIDTH)
        ));
    }

    let day_max = patterns
        .day_of_week
        .iter()
        .map(|b| u64::from(b.incidents))
        .max()
        .unwrap_or(0);
    lines.push(String::new());
    lines.push("Incidents by weekday".to_string());
    for b in &patterns.day_of_week {
        lines.push(format!(
            "  {:<10}{:>5}  {}",
            b.label(),
            b.incidents,
            render_bar(u64::from(b.incidents), day_max, BAR_WIDTH)
        ));
    }

    if let (Some(hour), Some(day)) = (patterns.busiest_hour(), patterns.busiest_day()) {
        lines.push(String::new());
        lines.push(format!("  Busiest: {} at {}", day.label(), hour.label()));
    }

    lines.join("\n")
}

pub fn render_demographics(complexity: &CaseComplexity) -> String {
    let mut lines = vec![
        heading("Case complexity"),
        row(
            "People per case",
            format_number(complexity.avg_people_per_case, 1),
        ),
        row(
            "Unknown suspects",
            format_percent(complexity.unknown_suspect_rate),
        ),
        row(
            "Multi-vehicle cases",
            format_percent(complexity.multi_vehicle_rate),
        ),
    ];

    let max = complexity
        .age_groups
        .iter()
        .map(|g| u64::from(g.count))
        .max()
        .unwrap_or(0);
    lines.push(String::new());
    lines.push("Age groups".to_string());
    if complexity.age_groups.is_empty() {
        lines.push("  no known ages".to_string());
    }
    for g in &complexity.age_groups {
        lines.push(format!(
            "  {:<10}{:>5}  {}",
            g.range.label(),
            g.count,
            render_bar(u64::from(g.count), max, BAR_WIDTH)
        ));
    }

    lines.join("\n")
}

pub fn render_cases(cases: &[&CaseRecord], limit: usize) -> String {
    let mut lines = vec![heading("Cases")];
    for record in cases.iter().take(limit) {
        lines.push(format!(
            "  FIR {:<8}{:<24}{:<8}{}",
            record.fir_details.fir_number,
            record.station_id(),
            record.severity().label(),
            record
                .incident_details
                .place_of_occurrence
                .address
                .as_deref()
                .unwrap_or("-")
        ));
    }
    if cases.len() > limit {
        lines.push(format!("  ... {} more", cases.len() - limit));
    }
    if cases.is_empty() {
        lines.push("  no matching cases".to_string());
    }
    lines.join("\n")
}

fn coordinates(location: Option<(f64, f64)>) -> String {
    match location {
        Some((lat, lng)) => format!("{:.4}, {:.4}", lat, lng),
        None => "unknown".to_string(),
    }
}

pub fn render_map(layer: &MapLayer, limit: usize) -> String {
    let mut lines = vec![
        heading("Incident map"),
        row(
            "Located incidents",
            format_count(layer.points.len() as u64),
        ),
        row("Centre", coordinates(layer.center)),
    ];

    if !layer.points.is_empty() {
        lines.push(String::new());
        lines.push("Heat points".to_string());
    }
    for p in layer.points.iter().take(limit) {
        lines.push(format!(
            "  {:<24}intensity {}",
            coordinates(Some((p.lat, p.lng))),
            format_number(p.intensity, 1)
        ));
    }
    if layer.points.len() > limit {
        lines.push(format!("  ... {} more", layer.points.len() - limit));
    }

    lines.join("\n")
}

pub fn render_options(options: &FilterOptions) -> String {
    let mut lines = vec![heading("Filter options")];

    for (title, values) in [
        ("Stations", &options.stations),
        ("Keywords", &options.keywords),
    ] {
        lines.push(String::new());
        lines.push(format!("{} ({})", title, values.len()));
        if values.is_empty() {
            lines.push("  none".to_string());
        }
        lines.extend(values.iter().map(|v| format!("  {}", v)));
    }

    lines.join("\n")
}

// ── Case detail ────────────────────────────────────────────────────────────────

/// Plain-text detail of one case, or a not-found notice for `fir_number`.
pub fn render_case_text(
    detail: Option<&CaseDetail>,
    fir_number: &str,
    warning: Option<&str>,
) -> String {
    let mut sections: Vec<String> = Vec::new();
    if let Some(w) = warning {
        sections.push(format!("WARNING: {}", w));
    }

    match detail {
        Some(detail) => sections.push(render_case_detail(detail)),
        None => sections.push(format!(
            "{}\n  No case with FIR number {}",
            heading("Case not found"),
            fir_number
        )),
    }

    finish(sections)
}

pub fn render_case_detail(detail: &CaseDetail) -> String {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        heading(&format!("FIR {}", detail.fir_number)),
        row("Police station", &detail.police_station),
        row("Severity", detail.severity.label()),
        row("Incident type", detail.incident_type.label()),
        row("Date", or_dash(&detail.start_date)),
        row("Time", or_dash(&detail.start_time)),
        row("Day", or_dash(&detail.day_of_week)),
        row("Location", or_dash(&detail.address)),
        row("Distance", format_distance(detail.distance_km)),
        row("Coordinates", coordinates(detail.location)),
    ];

    lines.push(String::new());
    lines.push(format!(
        "People involved ({}): {} deceased, {} injured",
        detail.people, detail.deceased, detail.injured
    ));
    for (title, group) in [
        ("Accused", &detail.accused),
        ("Victims", &detail.victims),
        ("Complainants", &detail.complainants),
        ("Others", &detail.witnesses),
    ] {
        if group.is_empty() {
            continue;
        }
        lines.push(format!("  {} ({})", title, group.len()));
        lines.extend(group.iter().map(person_line));
    }

    if !detail.vehicles.is_empty() {
        lines.push(String::new());
        lines.push(format!("Vehicles ({})", detail.vehicles.len()));
        for v in &detail.vehicles {
            lines.push(format!(
                "  {:<16}{:<16}{:<16}{}",
                v.registration_number.as_deref().unwrap_or("unregistered"),
                v.vehicle_type.as_deref().unwrap_or("-"),
                v.make.as_deref().unwrap_or("-"),
                v.role.as_str()
            ));
        }
    }

    if !detail.sections.is_empty() {
        lines.push(String::new());
        lines.push("Sections applied".to_string());
        for s in &detail.sections {
            lines.push(format!("  {} {}", s.act, s.section));
        }
    }

    lines.push(String::new());
    lines.push("Summary".to_string());
    lines.push(format!(
        "  {}",
        detail.summary.as_deref().unwrap_or("No summary available")
    ));
    if !detail.keywords.is_empty() {
        lines.push(format!("  Keywords: {}", detail.keywords.join(", ")));
    }

    lines.join("\n")
}

fn person_line(person: &PersonDetail) -> String {
    let mut line = format!(
        "    {:<24}age {}",
        person.name.as_deref().unwrap_or("-"),
        person
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    if person.deceased {
        line.push_str("  Deceased");
    }
    if person.injured {
        line.push_str("  Injured");
    }
    if let PersonRole::Other(role) = &person.role {
        line.push_str(&format!("  ({})", role));
    }
    line
}

/// JSON detail of one case; `null` when it was not found.
pub fn render_case_json(detail: Option<&CaseDetail>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&detail)
}

// ── JSON rendering ─────────────────────────────────────────────────────────────

/// JSON document for `view`. The `all` view is the whole analysis result.
pub fn render_json(view: View, report: &Report) -> serde_json::Result<String> {
    let result = report.result;
    let value = match view {
        View::Summary => serde_json::to_value(&result.summary)?,
        View::Stations => serde_json::to_value(&result.stations)?,
        View::Temporal => serde_json::to_value(&result.temporal)?,
        View::Demographics => serde_json::to_value(&result.complexity)?,
        View::Cases => Value::Array(
            report
                .cases
                .iter()
                .take(report.limit)
                .map(|r| case_json(r))
                .collect(),
        ),
        View::Map => serde_json::to_value(report.map)?,
        View::Options => serde_json::to_value(report.options)?,
        View::All => serde_json::to_value(result)?,
    };
    serde_json::to_string_pretty(&value)
}

fn case_json(record: &CaseRecord) -> Value {
    json!({
        "firNumber": record.fir_details.fir_number,
        "policeStation": record.station_id(),
        "reportedAt": record.reported_at().map(|ts| ts.to_rfc3339()),
        "severity": record.severity().label(),
        "address": record.incident_details.place_of_occurrence.address,
        "persons": record.persons_involved.len(),
        "vehicles": record.vehicles_involved.len(),
        "keywords": record.keywords(),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
