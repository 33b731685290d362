use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the FIR dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of case records.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// The dataset file does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// The one-shot load was aborted before it completed.
    #[error("Load cancelled before completion")]
    Cancelled,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// `true` for failures of the single dataset load. The caller recovers
    /// from these by substituting an empty record sequence.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::FileRead { .. }
                | DashboardError::JsonParse(_)
                | DashboardError::DataPathNotFound(_)
                | DashboardError::Cancelled
        )
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/fir.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/fir.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = DashboardError::TimestampParse("yesterday".to_string());
        assert_eq!(err.to_string(), "Invalid timestamp format: yesterday");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = DashboardError::DataPathNotFound(PathBuf::from("/missing/fir.json"));
        assert_eq!(err.to_string(), "Data path not found: /missing/fir.json");
    }

    #[test]
    fn test_error_display_cancelled() {
        assert_eq!(
            DashboardError::Cancelled.to_string(),
            "Load cancelled before completion"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("reference year out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: reference year out of range"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_is_load_error_classification() {
        assert!(DashboardError::Cancelled.is_load_error());
        assert!(DashboardError::DataPathNotFound(PathBuf::from("x")).is_load_error());
        assert!(!DashboardError::Config("bad".to_string()).is_load_error());
        assert!(!DashboardError::TimestampParse("March".to_string()).is_load_error());
        let denied = DashboardError::FileRead {
            path: PathBuf::from("/data/fir.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(denied.is_load_error());
        assert!(denied.to_string().contains("denied"));
    }
}
