//! Persistent CLI configuration.
//!
//! Loaded from `~/.config/hisab/config.toml` on Linux,
//! `~/Library/Application Support/hisab/config.toml` on macOS and
//! `%APPDATA%\hisab\config.toml` on Windows. Every key is optional.

use hisab::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Calendar used for date arguments and output ("AD" or "BS").
    pub calendar: Option<CalendarType>,
    /// Day-count basis for bank interest.
    pub year_days: Option<u32>,
    /// "roll-forward" or "clamp-to-february".
    pub leap_day_policy: Option<LeapDayPolicy>,
    /// Decimal places shown for amounts.
    pub precision: Option<u32>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hisab"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads the default config file. A missing file (or no config
    /// directory) yields `CliConfig::default()`; a file that exists but
    /// cannot be read or parsed is an error.
    pub fn load() -> Result<Self, HisabError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                debug!("No config file found at {:?}", path);
                Ok(Self::default())
            }
            None => {
                debug!("Could not determine config directory");
                Ok(Self::default())
            }
        }
    }

    /// Loads the file at `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, HisabError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HisabError::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = toml::from_str::<CliConfig>(&content).map_err(|e| {
            HisabError::configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Library configuration with file values applied over the defaults.
    pub fn to_hisab_config(&self) -> Result<HisabConfig, HisabError> {
        let mut builder = HisabConfig::builder();
        if let Some(calendar) = self.calendar {
            builder = builder.calendar(calendar);
        }
        if let Some(days) = self.year_days {
            builder = builder.year_days(days);
        }
        if let Some(policy) = self.leap_day_policy {
            builder = builder.leap_day_policy(policy);
        }
        if let Some(precision) = self.precision {
            builder = builder.display_precision(precision);
        }
        builder.build().map_err(|e| e.with_source("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.calendar.is_none());
        assert_eq!(config.to_hisab_config().unwrap(), HisabConfig::default());
    }

    #[test]
    fn test_config_parses_kebab_case_keys() {
        let config: CliConfig = toml::from_str(
            r#"
            calendar = "BS"
            year-days = 366
            leap-day-policy = "clamp-to-february"
            "#,
        )
        .unwrap();

        let hisab = config.to_hisab_config().unwrap();
        assert_eq!(hisab.default_calendar, CalendarType::Bs);
        assert_eq!(hisab.year_days, 366);
        assert_eq!(hisab.leap_day_policy, LeapDayPolicy::ClampToFebruary);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let config = CliConfig {
            year_days: Some(100),
            ..Default::default()
        };
        let err = config.to_hisab_config().unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hisab-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_reads_file() {
        let path = write_temp("valid", "calendar = \"BS\"\nprecision = 3\n");
        let config = CliConfig::load_from(&path);
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.calendar, Some(CalendarType::Bs));
        assert_eq!(config.precision, Some(3));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        for (name, content) in [("syntax", "calendar = [broken"), ("value", "calendar = \"XX\"")] {
            let path = write_temp(name, content);
            let res = CliConfig::load_from(&path);
            std::fs::remove_file(&path).ok();

            let err = res.unwrap_err();
            assert!(matches!(err, HisabError::ConfigurationError { .. }));
            assert!(err.to_string().contains("Failed to parse config file"));
        }
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let res = CliConfig::load_from(Path::new("/nonexistent/hisab/config.toml"));
        assert!(matches!(res, Err(HisabError::ConfigurationError { .. })));
    }
}
