//! Configuration loading.
//!
//! The config file uses the upper-case keys of the original `config.json`:
//!
//! ```json
//! {
//!   "API_KEY": "...",
//!   "TOKEN": "...",
//!   "BOARD_ID": "...",
//!   "NAME": "Ada Lovelace",
//!   "MONTH": "03",
//!   "YEAR": "2024"
//! }
//! ```
//!
//! `MONTH` and `YEAR` may be numbers or numeric strings. Optional keys:
//! `FALLBACK_YEAR` (two-digit year for dates written without one, default
//! the reporting year) and `BASE_URL` (API root). A `.toml` file with the
//! same keys is read as TOML.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use otjlog_board::{TrelloCredentials, DEFAULT_BASE_URL};
use otjlog_core::{PeriodError, ReportPeriod};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing setting: {0} (set it in the config file or on the command line)")]
    Missing(&'static str),

    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

/// Detect config format from extension
pub fn detect_format(path: &Path) -> ConfigFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => ConfigFormat::Toml,
        _ => ConfigFormat::Json,
    }
}

/// Settings as written in the config file; every key is optional here
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "API_KEY")]
    pub api_key: Option<String>,
    #[serde(rename = "TOKEN")]
    pub token: Option<String>,
    #[serde(rename = "BOARD_ID")]
    pub board_id: Option<String>,
    #[serde(rename = "NAME")]
    pub name: Option<String>,
    #[serde(rename = "MONTH", default, deserialize_with = "number_or_string")]
    pub month: Option<u32>,
    #[serde(rename = "YEAR", default, deserialize_with = "number_or_string")]
    pub year: Option<i32>,
    #[serde(rename = "FALLBACK_YEAR", default, deserialize_with = "number_or_string")]
    pub fallback_year: Option<u32>,
    #[serde(rename = "BASE_URL")]
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str, format: ConfigFormat, path: &Path) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            ConfigFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, detect_format(path), path)
    }

    /// Values set in `other` win
    pub fn merge(self, other: FileConfig) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            token: other.token.or(self.token),
            board_id: other.board_id.or(self.board_id),
            name: other.name.or(self.name),
            month: other.month.or(self.month),
            year: other.year.or(self.year),
            fallback_year: other.fallback_year.or(self.fallback_year),
            base_url: other.base_url.or(self.base_url),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: TrelloCredentials,
    pub apprentice: String,
    pub period: ReportPeriod,
    pub fallback_year: u32,
    pub base_url: String,
}

impl Settings {
    pub fn resolve(config: FileConfig) -> Result<Self, ConfigError> {
        let month = config.month.ok_or(ConfigError::Missing("MONTH"))?;
        let year = config.year.ok_or(ConfigError::Missing("YEAR"))?;
        let period = ReportPeriod::new(month, year)?;

        Ok(Self {
            credentials: TrelloCredentials::new(
                config.api_key.ok_or(ConfigError::Missing("API_KEY"))?,
                config.token.ok_or(ConfigError::Missing("TOKEN"))?,
                config.board_id.ok_or(ConfigError::Missing("BOARD_ID"))?,
            ),
            apprentice: config.name.ok_or(ConfigError::Missing("NAME"))?,
            period,
            fallback_year: config
                .fallback_year
                .map_or_else(|| year.rem_euclid(100).unsigned_abs(), |y| y % 100),
            base_url: config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn json(content: &str) -> Result<FileConfig, ConfigError> {
        FileConfig::parse(content, ConfigFormat::Json, Path::new("config.json"))
    }

    fn full() -> FileConfig {
        json(r#"{"API_KEY":"k","TOKEN":"t","BOARD_ID":"b","NAME":"Ada","MONTH":"03","YEAR":"2024"}"#)
            .unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("config.toml")), ConfigFormat::Toml);
        assert_eq!(detect_format(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(detect_format(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_month_and_year_as_strings_or_numbers() {
        let config = full();
        assert_eq!(config.month, Some(3));
        assert_eq!(config.year, Some(2024));

        let numeric = json(r#"{"MONTH": 11, "YEAR": 2025}"#).unwrap();
        assert_eq!(numeric.month, Some(11));
        assert_eq!(numeric.year, Some(2025));
    }

    #[test]
    fn test_non_numeric_month_is_rejected() {
        assert!(matches!(json(r#"{"MONTH": "March"}"#), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(full()).unwrap();
        assert_eq!(settings.period, ReportPeriod::new(3, 2024).unwrap());
        assert_eq!(settings.fallback_year, 24);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.apprentice, "Ada");
        assert_eq!(settings.credentials.board_id, "b");
    }

    #[test]
    fn test_explicit_fallback_year() {
        let config = full().merge(FileConfig {
            fallback_year: Some(23),
            ..FileConfig::default()
        });
        assert_eq!(Settings::resolve(config).unwrap().fallback_year, 23);
    }

    #[test]
    fn test_missing_setting_is_named() {
        let mut config = full();
        config.token = None;
        let err = Settings::resolve(config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TOKEN")));
        assert!(err.to_string().contains("TOKEN"));
    }

    #[test]
    fn test_invalid_month() {
        let config = full().merge(FileConfig {
            month: Some(13),
            ..FileConfig::default()
        });
        assert!(matches!(
            Settings::resolve(config),
            Err(ConfigError::Period(PeriodError::InvalidMonth(13)))
        ));
    }

    #[test]
    fn test_overrides_win() {
        let merged = full().merge(FileConfig {
            month: Some(4),
            name: Some("Grace".into()),
            ..FileConfig::default()
        });
        assert_eq!(merged.month, Some(4));
        assert_eq!(merged.name.as_deref(), Some("Grace"));
        assert_eq!(merged.year, Some(2024));
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "API_KEY = \"k\"\nTOKEN = \"t\"\nBOARD_ID = \"b\"").unwrap();
        writeln!(file, "NAME = \"Ada\"\nMONTH = 3\nYEAR = \"2024\"").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.month, Some(3));
        assert_eq!(config.year, Some(2024));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
