use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::era::{self, ERA, FIRST_YEAR, LAST_YEAR};
use crate::types::HisabError;

pub const MONTH_NAMES: [&str; 12] = [
    "Baisakh", "Jestha", "Asar", "Shrawan", "Bhadra", "Asoj",
    "Kartik", "Mangsir", "Poush", "Magh", "Falgun", "Chaitra",
];

fn coverage_label() -> String {
    format!("BS {}-{} (AD {} onwards)", FIRST_YEAR, LAST_YEAR, ERA.epoch)
}

/// A validated Bikram Sambat calendar date.
///
/// Construction goes through [`BsDate::new`], so every value maps to a
/// real Gregorian day under the embedded era table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BsDate {
    year: i32,
    month: u8,
    day: u8,
}

impl BsDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, HisabError> {
        let length = days_in_bs_month(year, month)?;
        if day == 0 || day > length as u32 {
            return Err(HisabError::invalid_input(
                "day",
                day,
                format!("BS {}-{:02} has {} days", year, month, length),
            ));
        }
        Ok(Self { year, month: month as u8, day: day as u8 })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month, 1 = Baisakh.
    pub fn month(&self) -> u32 {
        self.month as u32
    }

    pub fn day(&self) -> u32 {
        self.day as u32
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Midnight of the matching Gregorian day.
    pub fn to_gregorian(&self) -> Result<NaiveDateTime, HisabError> {
        to_gregorian(self.year, self.month as u32, self.day as u32)
    }

    pub fn to_gregorian_date(&self) -> Result<NaiveDate, HisabError> {
        self.to_gregorian().map(|instant| instant.date())
    }
}

impl std::fmt::Display for BsDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl TryFrom<String> for BsDate {
    type Error = HisabError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BsDate> for String {
    fn from(date: BsDate) -> Self {
        date.to_string()
    }
}

impl FromStr for BsDate {
    type Err = HisabError;

    /// Parses `YYYY-MM-DD`, the format BS date pickers emit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HisabError::invalid_input("bs_date", s, "Expected YYYY-MM-DD");

        let parts: Vec<&str> = s.trim().split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(malformed());
        };
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        let day = day.parse::<u32>().map_err(|_| malformed())?;

        BsDate::new(year, month, day)
    }
}

/// Number of days in a BS month.
pub fn days_in_bs_month(year: i32, month: u32) -> Result<u8, HisabError> {
    if !(1..=12).contains(&month) {
        return Err(HisabError::invalid_input("month", month, "Month must be between 1 and 12"));
    }
    let months = era::months_of(year).ok_or_else(|| HisabError::out_of_range("year", year, coverage_label()))?;
    Ok(months[(month - 1) as usize])
}

/// Number of days in a BS year.
pub fn bs_year_length(year: i32) -> Result<u32, HisabError> {
    let months = era::months_of(year).ok_or_else(|| HisabError::out_of_range("year", year, coverage_label()))?;
    Ok(months.iter().map(|&d| d as u32).sum())
}

/// First and last Gregorian days the era table covers.
pub fn bs_coverage() -> (NaiveDate, NaiveDate) {
    let last = ERA
        .epoch
        .checked_add_days(Days::new((ERA.total_days() - 1) as u64))
        .unwrap_or(ERA.epoch);
    (ERA.epoch, last)
}

/// Converts a Gregorian instant to its Bikram Sambat date.
///
/// Only the calendar day of `instant` matters; time of day is ignored.
pub fn to_bikram_sambat(instant: NaiveDateTime) -> Result<BsDate, HisabError> {
    to_bikram_sambat_date(instant.date())
}

pub fn to_bikram_sambat_date(date: NaiveDate) -> Result<BsDate, HisabError> {
    let offset = (date - ERA.epoch).num_days();
    if offset < 0 || offset >= ERA.total_days() {
        let (first, last) = bs_coverage();
        return Err(HisabError::out_of_range("date", date, format!("AD {} to {}", first, last)));
    }

    // Largest year whose 1 Baisakh is on or before `offset`.
    let index = ERA.year_offsets.partition_point(|&start| start <= offset) - 1;
    let year = FIRST_YEAR + index as i32;
    let mut remaining = offset - ERA.year_offsets[index];

    let months = era::months_of(year).ok_or_else(|| HisabError::out_of_range("date", date, coverage_label()))?;
    for (i, &length) in months.iter().enumerate() {
        let length = length as i64;
        if remaining < length {
            return Ok(BsDate {
                year,
                month: (i + 1) as u8,
                day: (remaining + 1) as u8,
            });
        }
        remaining -= length;
    }

    // Offsets are cumulative sums of these same months.
    Err(HisabError::out_of_range("date", date, coverage_label()))
}

/// Converts a Bikram Sambat date to midnight of the matching Gregorian day.
pub fn to_gregorian(year: i32, month: u32, day: u32) -> Result<NaiveDateTime, HisabError> {
    let length = days_in_bs_month(year, month)?;
    if day == 0 || day > length as u32 {
        return Err(HisabError::invalid_input(
            "day",
            day,
            format!("BS {}-{:02} has {} days", year, month, length),
        ));
    }

    let year_start = ERA
        .year_offset(year)
        .ok_or_else(|| HisabError::out_of_range("year", year, coverage_label()))?;
    let months = era::months_of(year).ok_or_else(|| HisabError::out_of_range("year", year, coverage_label()))?;
    let before_month: i64 = months[..(month - 1) as usize].iter().map(|&d| d as i64).sum();
    let offset = year_start + before_month + (day as i64 - 1);

    let date = ERA
        .epoch
        .checked_add_days(Days::new(offset as u64))
        .ok_or_else(|| HisabError::overflow("bs_to_gregorian"))?;
    Ok(date.and_time(NaiveTime::MIN))
}
