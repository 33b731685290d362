mod bootstrap;
mod report;

use std::borrow::Cow;

use anyhow::Result;
use dashboard_core::models::CaseRecord;
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{analyze, AnalysisConfig};
use dashboard_data::case_detail::{find_case, CaseDetail};
use dashboard_data::query::{search, FilterOptions, MapLayer, RecordFilter};
use dashboard_data::reader::resolve_data_path;
use dashboard_runtime::orchestrator::DashboardLoader;

use crate::report::{Report, View};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("FIR Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Format: {}, Reference year: {}",
        settings.view,
        settings.format,
        settings.reference_year
    );

    // Validate the filters before paying for the load.
    let (from, to) = settings.date_range()?;
    let filter = RecordFilter {
        station: settings.station.clone(),
        keyword: settings.keyword.clone(),
        from,
        to,
    };

    let explicit = settings.data_file.clone().or_else(bootstrap::discover_data_path);
    let data_path = resolve_data_path(explicit.as_deref());
    tracing::info!("Loading dataset from {}", data_path.display());

    let handle = DashboardLoader::new(data_path).start();
    let state = tokio::select! {
        state = handle.settled() => state,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; cancelling dataset load");
            handle.abort();
            handle.state()
        }
    };
    let (store, warning) = state.into_store();
    let json = settings.format == "json";
    if json {
        if let Some(w) = &warning {
            eprintln!("WARNING: {}", w);
        }
    }

    if let Some(fir_number) = settings.fir.as_deref() {
        let detail = find_case(store.records(), fir_number)
            .map(|record| CaseDetail::from_record(record, settings.reference_year));
        let output = if json {
            report::render_case_json(detail.as_ref())?
        } else {
            report::render_case_text(detail.as_ref(), fir_number, warning.as_deref())
        };
        println!("{}", output);
        return Ok(());
    }

    let selected: Cow<[CaseRecord]> = if filter.is_empty() {
        Cow::Borrowed(store.records())
    } else {
        Cow::Owned(filter.apply(store.records()))
    };
    let cases: Vec<&CaseRecord> = search(&selected, settings.search.as_deref().unwrap_or(""));
    tracing::debug!(
        "{} of {} records selected, {} match the search",
        selected.len(),
        store.len(),
        cases.len()
    );

    // Aggregates and the map cover the searched subset when a search is given.
    let matched: Option<Vec<CaseRecord>> = settings
        .search
        .is_some()
        .then(|| cases.iter().map(|r| (*r).clone()).collect());
    let analysed: &[CaseRecord] = matched.as_deref().unwrap_or(&*selected);

    let config = AnalysisConfig {
        reference_year: settings.reference_year,
    };
    let result = analyze(analysed, &config);
    let map = MapLayer::from_records(analysed);
    // Options span the whole dataset, not just the filtered records.
    let options = FilterOptions::from_records(store.records());

    let view = View::parse(&settings.view);
    let report = Report {
        result: &result,
        cases: &cases,
        map: &map,
        options: &options,
        limit: settings.limit,
        warning: warning.as_deref(),
    };
    let output = if json {
        report::render_json(view, &report)?
    } else {
        report::render_text(view, &report)
    };
    println!("{}", output);

    Ok(())
}
