use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::calculations::DEFAULT_REFERENCE_YEAR;
use crate::data_processors::TimestampProcessor;
use crate::error::{DashboardError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analytics over First Information Report case records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fir-dashboard",
    about = "Analytics over First Information Report case records",
    version
)]
pub struct Settings {
    /// Path to the FIR dataset (JSON array of case records)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Report section to render
    #[arg(long, default_value = "all", value_parser = ["summary", "stations", "temporal", "demographics", "cases", "map", "options", "all"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Year ages are computed against
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR, value_parser = clap::value_parser!(i32).range(1900..=2100))]
    pub reference_year: i32,

    /// Only include cases reported by this police station
    #[arg(long)]
    pub station: Option<String>,

    /// Only include cases tagged with this keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Only include cases reported on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only include cases reported on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Free-text search over FIR number, address, names and registrations
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum number of cases listed by the cases view
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Show the full detail of the case with this FIR number instead of a view
    #[arg(long, value_name = "NUMBER")]
    pub fir: Option<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.fir-dashboard/last_used.json`.
///
/// Filters are deliberately absent: they apply to a single invocation.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

impl LastUsedParams {
    /// Default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".fir-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with an explicit argument list
    /// and config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Raw ArgMatches are needed to query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins.
        if settings.data_file.is_none() {
            settings.data_file = last.data_file;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "reference_year") {
            if let Some(v) = last.reference_year {
                settings.reference_year = v;
            }
        }

        settings = Self::apply_debug(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!("Failed to persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// Parse `--from` / `--to` into calendar dates.
    ///
    /// Fails when either bound is malformed or `from` is after `to`.
    pub fn date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let from = self
            .from
            .as_deref()
            .map(TimestampProcessor::parse_date)
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .map(TimestampProcessor::parse_date)
            .transpose()?;

        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(DashboardError::Config(format!(
                    "--from {} is after --to {}",
                    start, end
                )));
            }
        }

        Ok((from, to))
    }

    /// `--debug` overrides log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_file: s.data_file.clone(),
            view: Some(s.view.clone()),
            format: Some(s.format.clone()),
            reference_year: Some(s.reference_year),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data_file: Some(PathBuf::from("/data/fir.json")),
            view: Some("stations".to_string()),
            format: Some("json".to_string()),
            reference_year: Some(2023),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.data_file, Some(PathBuf::from("/data/fir.json")));
        assert_eq!(loaded.view, Some("stations".to_string()));
        assert_eq!(loaded.format, Some("json".to_string()));
        assert_eq!(loaded.reference_year, Some(2023));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).view.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).format.is_none());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["fir-dashboard"]);

        assert!(settings.data_file.is_none());
        assert_eq!(settings.view, "all");
        assert_eq!(settings.format, "text");
        assert_eq!(settings.reference_year, 2024);
        assert!(settings.station.is_none());
        assert!(settings.keyword.is_none());
        assert!(settings.search.is_none());
        assert_eq!(settings.limit, 20);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_rejects_out_of_range_reference_year() {
        let result = Settings::try_parse_from(["fir-dashboard", "--reference-year", "1800"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["fir-dashboard", "--view", "heatmap"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_map_options_views_and_fir() {
        for view in ["map", "options"] {
            let settings = Settings::parse_from(["fir-dashboard", "--view", view]);
            assert_eq!(settings.view, view);
            assert!(settings.fir.is_none());
        }

        let settings = Settings::parse_from(["fir-dashboard", "--fir", "0142/2024"]);
        assert_eq!(settings.fir.as_deref(), Some("0142/2024"));
    }

    #[test]
    fn test_date_range_parsing() {
        let settings = Settings::parse_from([
            "fir-dashboard",
            "--from",
            "2024-01-01",
            "--to",
            "2024-03-31",
        ]);
        let (from, to) = settings.date_range().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let settings = Settings::parse_from([
            "fir-dashboard",
            "--from",
            "2024-05-01",
            "--to",
            "2024-03-31",
        ]);
        let err = settings.date_range().unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_date_range_rejects_malformed_bound() {
        let settings = Settings::parse_from(["fir-dashboard", "--to", "soon"]);
        assert!(matches!(
            settings.date_range(),
            Err(DashboardError::TimestampParse(_))
        ));
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            data_file: Some(PathBuf::from("/srv/fir.json")),
            view: Some("temporal".to_string()),
            format: Some("json".to_string()),
            reference_year: Some(2022),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["fir-dashboard".into()], &config_path);
        assert_eq!(settings.data_file, Some(PathBuf::from("/srv/fir.json")));
        assert_eq!(settings.view, "temporal");
        assert_eq!(settings.format, "json");
        assert_eq!(settings.reference_year, 2022);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            view: Some("temporal".to_string()),
            reference_year: Some(2022),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "fir-dashboard".into(),
                "--view".into(),
                "summary".into(),
                "--reference-year".into(),
                "2024".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.view, "summary");
        assert_eq!(settings.reference_year, 2024);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            view: Some("stations".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["fir-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists());
        assert_eq!(settings.view, "all");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["fir-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_does_not_persist_filters() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "fir-dashboard".into(),
                "--station".into(),
                "Kotwali".into(),
                "--format".into(),
                "json".into(),
            ],
            &config_path,
        );

        let raw = std::fs::read_to_string(&config_path).expect("persisted");
        assert!(!raw.contains("Kotwali"));
        assert_eq!(
            LastUsedParams::load_from(&config_path).format,
            Some("json".to_string())
        );
    }
}
