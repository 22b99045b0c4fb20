use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use strum::{Display, EnumString};

use crate::builder::{ConfigBuilder, Validate};
use crate::calendar::CalendarType;
use crate::types::HisabError;

pub const DEFAULT_YEAR_DAYS: u32 = 365;
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;

/// What a 29 February birthday becomes in a year without that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum LeapDayPolicy {
    /// Celebrate on 1 March.
    #[default]
    RollForward,
    /// Celebrate on 28 February.
    ClampToFebruary,
}

/// Settings shared by every calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HisabConfig {
    /// Day-count basis for simple bank interest.
    pub year_days: u32,
    /// Calendar used when the caller does not pick one.
    pub default_calendar: CalendarType,
    pub leap_day_policy: LeapDayPolicy,
    /// Decimal places used by display helpers. Calculations never round.
    pub display_precision: u32,
}

impl Default for HisabConfig {
    fn default() -> Self {
        HisabConfig {
            year_days: DEFAULT_YEAR_DAYS,
            default_calendar: CalendarType::default(),
            leap_day_policy: LeapDayPolicy::default(),
            display_precision: DEFAULT_DISPLAY_PRECISION,
        }
    }
}

impl std::str::FromStr for HisabConfig {
    type Err = HisabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: HisabConfig = serde_json::from_str(s)
            .map_err(|e| HisabError::configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl HisabConfig {
    pub fn builder() -> HisabConfigBuilder {
        HisabConfigBuilder::default()
    }

    pub fn new(year_days: u32, default_calendar: CalendarType) -> Result<Self, HisabError> {
        let config = Self {
            year_days,
            default_calendar,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), HisabError> {
        if !(360..=366).contains(&self.year_days) {
            return Err(HisabError::configuration(format!(
                "year_days must be between 360 and 366, got {}",
                self.year_days
            )));
        }
        if self.display_precision > 10 {
            return Err(HisabError::configuration(format!(
                "display_precision must be at most 10, got {}",
                self.display_precision
            )));
        }
        Ok(())
    }

    /// Loads configuration from `HISAB_YEAR_DAYS`, `HISAB_CALENDAR` and
    /// `HISAB_LEAP_DAY_POLICY`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, HisabError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("HISAB_YEAR_DAYS") {
            config.year_days = raw
                .trim()
                .parse()
                .map_err(|e| HisabError::configuration(format!("Invalid HISAB_YEAR_DAYS '{}': {}", raw, e)))?;
        }
        if let Ok(raw) = env::var("HISAB_CALENDAR") {
            config.default_calendar = raw
                .trim()
                .parse()
                .map_err(|_| HisabError::configuration(format!("Invalid HISAB_CALENDAR '{}': expected AD or BS", raw)))?;
        }
        if let Ok(raw) = env::var("HISAB_LEAP_DAY_POLICY") {
            config.leap_day_policy = raw.trim().parse().map_err(|_| {
                HisabError::configuration(format!(
                    "Invalid HISAB_LEAP_DAY_POLICY '{}': expected roll-forward or clamp-to-february",
                    raw
                ))
            })?;
        }

        config.validate()?;
        tracing::debug!(?config, "Loaded configuration from environment");
        Ok(config)
    }

    /// Attempts to load configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, HisabError> {
        let content = fs::read_to_string(path)
            .map_err(|e| HisabError::configuration(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    pub fn with_year_days(mut self, year_days: u32) -> Self {
        self.year_days = year_days;
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarType) -> Self {
        self.default_calendar = calendar;
        self
    }

    pub fn with_leap_day_policy(mut self, policy: LeapDayPolicy) -> Self {
        self.leap_day_policy = policy;
        self
    }

    pub fn with_display_precision(mut self, precision: u32) -> Self {
        self.display_precision = precision;
        self
    }
}

// ========== HisabConfigBuilder ==========

#[derive(Default)]
pub struct HisabConfigBuilder {
    year_days: Option<u32>,
    default_calendar: Option<CalendarType>,
    leap_day_policy: Option<LeapDayPolicy>,
    display_precision: Option<u32>,
}

impl HisabConfigBuilder {
    pub fn year_days(mut self, days: u32) -> Self {
        self.year_days = Some(days);
        self
    }

    pub fn calendar(mut self, calendar: CalendarType) -> Self {
        self.default_calendar = Some(calendar);
        self
    }

    pub fn leap_day_policy(mut self, policy: LeapDayPolicy) -> Self {
        self.leap_day_policy = Some(policy);
        self
    }

    pub fn display_precision(mut self, precision: u32) -> Self {
        self.display_precision = Some(precision);
        self
    }

    fn assemble(&self) -> HisabConfig {
        let defaults = HisabConfig::default();
        HisabConfig {
            year_days: self.year_days.unwrap_or(defaults.year_days),
            default_calendar: self.default_calendar.unwrap_or(defaults.default_calendar),
            leap_day_policy: self.leap_day_policy.unwrap_or(defaults.leap_day_policy),
            display_precision: self.display_precision.unwrap_or(defaults.display_precision),
        }
    }
}

impl Validate for HisabConfigBuilder {
    fn validate(&self) -> Result<(), HisabError> {
        self.assemble()
            .validate()
            .map_err(|e| e.with_source("HisabConfigBuilder"))
    }
}

impl ConfigBuilder<HisabConfig> for HisabConfigBuilder {
    fn build(self) -> Result<HisabConfig, HisabError> {
        Validate::validate(&self)?;
        Ok(self.assemble())
    }
}
