//! Dataset loading for the FIR dashboard.
//!
//! Reads the single JSON document holding every case record, validates each
//! record and exposes the result as an immutable [`RecordStore`] snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::CaseRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// File name of the dataset shipped with the dashboard.
pub const DEFAULT_DATA_FILE: &str = "fir_database_en_with_coordinates.json";

// ── RecordStore ───────────────────────────────────────────────────────────────

/// One loaded, validated snapshot of the dataset.
///
/// Cloning is cheap: the records live behind an `Arc` and are never mutated.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[CaseRecord]>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
    dropped: usize,
}

impl RecordStore {
    /// Load and validate the dataset at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let (records, dropped) = load_records(path)?;
        Ok(Self {
            records: records.into(),
            source: Some(path.to_path_buf()),
            loaded_at: Utc::now(),
            dropped,
        })
    }

    /// A store over records already in memory (validation still applies).
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        let (records, dropped) = validate_records(records);
        Self {
            records: records.into(),
            source: None,
            loaded_at: Utc::now(),
            dropped,
        }
    }

    /// An empty store, substituted when the load fails.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of records rejected by validation.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and parse the dataset, then drop invalid records.
///
/// Returns `(records, dropped_count)`; records keep their file order.
pub fn load_records(path: &Path) -> Result<(Vec<CaseRecord>, usize)> {
    if !path.exists() {
        return Err(DashboardError::DataPathNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let documents: Vec<Value> = serde_json::from_str(&content)?;
    let total = documents.len();
    let (parsed, malformed) = parse_records(documents);
    let (records, invalid) = validate_records(parsed);

    debug!(
        "Loaded {} of {} records from {}",
        records.len(),
        total,
        path.display()
    );

    Ok((records, malformed + invalid))
}

/// Load the dataset, substituting an empty store on failure.
///
/// Returns the store and, on failure, the warning to surface to the operator.
pub fn load_or_empty(path: &Path) -> (RecordStore, Option<String>) {
    match RecordStore::load(path) {
        Ok(store) => (store, None),
        Err(e) => {
            let message = load_warning(&e);
            warn!("{}", message);
            (RecordStore::empty(), Some(message))
        }
    }
}

/// Operator-facing warning for a failed load.
pub fn load_warning(error: &DashboardError) -> String {
    format!("Could not load FIR data: {}", error)
}

/// Resolve the dataset path: an explicit path wins, otherwise the default
/// file under `~/.fir-dashboard/data/`.
pub fn resolve_data_path(data_path: Option<&Path>) -> PathBuf {
    if let Some(p) = data_path {
        return p.to_path_buf();
    }

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".fir-dashboard").join("data").join(DEFAULT_DATA_FILE)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Deserialize each array element on its own so one bad record does not sink
/// the whole dataset. Returns the records and the number skipped.
fn parse_records(documents: Vec<Value>) -> (Vec<CaseRecord>, usize) {
    let mut records = Vec::with_capacity(documents.len());
    let mut skipped = 0usize;

    for (index, document) in documents.into_iter().enumerate() {
        match serde_json::from_value::<CaseRecord>(document) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping malformed record at index {}: {}", index, e);
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

/// Split `records` into those satisfying the record invariants and a count of
/// the rest.
fn validate_records(records: Vec<CaseRecord>) -> (Vec<CaseRecord>, usize) {
    let total = records.len();
    let valid: Vec<CaseRecord> = records
        .into_iter()
        .filter(|record| match validation_failure(record) {
            None => true,
            Some(reason) => {
                warn!(
                    "Dropping FIR {:?}: {}",
                    record.fir_details.fir_number, reason
                );
                false
            }
        })
        .collect();
    let dropped = total - valid.len();
    (valid, dropped)
}

/// Why `record` is unusable, or `None` when it is valid.
fn validation_failure(record: &CaseRecord) -> Option<&'static str> {
    if record.station_id().trim().is_empty() {
        return Some("blank police station");
    }
    let distance = record.distance_km();
    if !distance.is_finite() || distance < 0.0 {
        return Some("distance from station is negative or not a number");
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record_json(fir: &str, station: &str, distance: f64) -> serde_json::Value {
        json!({
            "firDetails": { "firNumber": fir, "policeStation": station },
            "incidentDetails": { "placeOfOccurrence": { "distanceFromPS_km": distance } }
        })
    }

    fn write_dataset(dir: &Path, value: &serde_json::Value) -> PathBuf {
        let path = dir.join(DEFAULT_DATA_FILE);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_load_records_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(
            dir.path(),
            &json!([
                record_json("3", "B", 1.0),
                record_json("1", "A", 2.0),
                record_json("2", "A", 3.0)
            ]),
        );

        let (records, dropped) = load_records(&path).unwrap();
        let firs: Vec<&str> = records
            .iter()
            .map(|r| r.fir_details.fir_number.as_str())
            .collect();
        assert_eq!(firs, vec!["3", "1", "2"]);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_load_records_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_records(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DashboardError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_records_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"firDetails\": ").unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, DashboardError::JsonParse(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_load_records_rejects_non_array_document() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(dir.path(), &json!({ "records": [] }));
        assert!(matches!(
            load_records(&path),
            Err(DashboardError::JsonParse(_))
        ));
    }

    #[test]
    fn test_validation_drops_blank_station_and_negative_distance() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(
            dir.path(),
            &json!([
                record_json("1", "A", 2.0),
                record_json("2", "   ", 2.0),
                record_json("3", "B", -1.0)
            ]),
        );

        let (records, dropped) = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(dropped, 2);
        assert_eq!(records[0].station_id(), "A");
    }

    #[test]
    fn test_unparseable_year_of_birth_keeps_record() {
        let dir = TempDir::new().unwrap();
        let mut odd = record_json("2", "A", 1.0);
        odd["personsInvolved"] = json!([{ "role": "Accused", "name": "X", "yob": "unknown" }]);
        let path = write_dataset(dir.path(), &json!([record_json("1", "A", 2.0), odd]));

        let (records, dropped) = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(dropped, 0);
        assert_eq!(records[1].persons_involved[0].yob, None);
    }

    #[test]
    fn test_malformed_record_is_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        let broken = json!({
            "firDetails": { "firNumber": "2", "policeStation": 17 },
            "incidentDetails": { "placeOfOccurrence": { "distanceFromPS_km": 1.0 } }
        });
        let path = write_dataset(
            dir.path(),
            &json!([
                record_json("1", "A", 2.0),
                broken,
                record_json("3", "   ", 2.0),
                record_json("4", "B", 3.0)
            ]),
        );

        let (records, dropped) = load_records(&path).unwrap();
        let firs: Vec<&str> = records
            .iter()
            .map(|r| r.fir_details.fir_number.as_str())
            .collect();
        assert_eq!(firs, vec!["1", "4"]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_record_store_load() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(dir.path(), &json!([record_json("1", "A", 2.0)]));

        let store = RecordStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.source(), Some(path.as_path()));
        assert_eq!(store.dropped(), 0);
    }

    #[test]
    fn test_record_store_clone_shares_records() {
        let record: CaseRecord = serde_json::from_value(record_json("1", "A", 2.0)).unwrap();
        let store = RecordStore::from_records(vec![record]);
        let copy = store.clone();
        assert!(std::ptr::eq(store.records(), copy.records()));
    }

    #[test]
    fn test_load_or_empty_substitutes_empty_store() {
        let dir = TempDir::new().unwrap();
        let (store, warning) = load_or_empty(&dir.path().join("absent.json"));

        assert!(store.is_empty());
        let warning = warning.expect("warning must be surfaced");
        assert!(warning.contains("Data path not found"));
    }

    #[test]
    fn test_load_or_empty_success_has_no_warning() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(dir.path(), &json!([]));
        let (store, warning) = load_or_empty(&path);
        assert!(store.is_empty());
        assert!(warning.is_none());
    }

    #[test]
    fn test_resolve_data_path_explicit() {
        let explicit = PathBuf::from("/srv/fir.json");
        assert_eq!(resolve_data_path(Some(&explicit)), explicit);
    }

    #[test]
    fn test_resolve_data_path_default_file_name() {
        let path = resolve_data_path(None);
        assert!(path.ends_with(Path::new(".fir-dashboard/data").join(DEFAULT_DATA_FILE)));
    }
}
