//! # Calendars
//!
//! Every calculation runs on Gregorian instants (`chrono::NaiveDateTime`).
//! Bikram Sambat dates are an input and display projection of those
//! instants, converted through the embedded era table in [`era`].

pub mod bikram_sambat;
pub mod era;
pub mod gregorian;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use bikram_sambat::{
    bs_coverage, bs_year_length, days_in_bs_month, to_bikram_sambat, to_bikram_sambat_date, to_gregorian, BsDate,
};

use crate::types::HisabError;

/// Calendar the user enters and reads dates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CalendarType {
    /// Gregorian (Anno Domini).
    #[default]
    #[strum(serialize = "AD")]
    #[serde(rename = "AD")]
    Ad,
    /// Bikram Sambat.
    #[strum(serialize = "BS")]
    #[serde(rename = "BS")]
    Bs,
}

impl CalendarType {
    /// Renders `instant` as `YYYY-MM-DD` in this calendar.
    pub fn project(&self, instant: NaiveDateTime) -> Result<String, HisabError> {
        match self {
            CalendarType::Ad => Ok(instant.date().format("%Y-%m-%d").to_string()),
            CalendarType::Bs => to_bikram_sambat(instant).map(|date| date.to_string()),
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            CalendarType::Ad => "Gregorian Calendar (AD)",
            CalendarType::Bs => "Bikram Sambat (BS)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_calendar_type_strings() {
        assert_eq!("bs".parse::<CalendarType>().unwrap(), CalendarType::Bs);
        assert_eq!("AD".parse::<CalendarType>().unwrap(), CalendarType::Ad);
        assert!("hijri".parse::<CalendarType>().is_err());
        assert_eq!(CalendarType::Bs.to_string(), "BS");
        assert_eq!(serde_json::to_string(&CalendarType::Ad).unwrap(), r#""AD""#);
    }

    #[test]
    fn test_long_names() {
        assert_eq!(CalendarType::Ad.long_name(), "Gregorian Calendar (AD)");
        assert_eq!(CalendarType::Bs.long_name(), "Bikram Sambat (BS)");
    }

    #[test]
    fn test_project_instant() {
        let instant = NaiveDate::from_ymd_opt(2024, 4, 13).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(CalendarType::Ad.project(instant).unwrap(), "2024-04-13");
        assert_eq!(CalendarType::Bs.project(instant).unwrap(), "2081-01-01");
    }
}
