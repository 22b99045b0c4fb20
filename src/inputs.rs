use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::calendar::{BsDate, CalendarType};
use crate::types::HisabError;

/// Trait for converting various types into `Decimal` amounts.
///
/// This lets callers pass `i32`, `f64`, `&str`, etc. directly into the
/// calculator builders without wrapping them in `dec!()` or `Decimal::from()`.
pub trait IntoMoney {
    fn into_money(self) -> Result<Decimal, HisabError>;
}

impl IntoMoney for Decimal {
    fn into_money(self) -> Result<Decimal, HisabError> {
        Ok(self)
    }
}

macro_rules! impl_into_money_int {
    ($($t:ty),*) => {
        $(
            impl IntoMoney for $t {
                fn into_money(self) -> Result<Decimal, HisabError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_money_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_money_float {
    ($($t:ty),*) => {
        $(
            impl IntoMoney for $t {
                fn into_money(self) -> Result<Decimal, HisabError> {
                    Decimal::from_f64_retain(self as f64)
                        .map(|d| d.normalize())
                        .ok_or_else(|| HisabError::invalid_input("amount", self, "Not a finite number"))
                }
            }
        )*
    };
}

impl_into_money_float!(f32, f64);

impl IntoMoney for &str {
    fn into_money(self) -> Result<Decimal, HisabError> {
        Decimal::from_str(self.trim())
            .map_err(|e| HisabError::invalid_input("amount", self, format!("Invalid number format: {}", e)))
    }
}

impl IntoMoney for String {
    fn into_money(self) -> Result<Decimal, HisabError> {
        self.as_str().into_money()
    }
}

/// A date entered in either calendar.
///
/// Gregorian input keeps its time of day; Bikram Sambat input always
/// resolves to midnight of the matching Gregorian day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateInput {
    Ad(NaiveDateTime),
    Bs(BsDate),
}

impl DateInput {
    /// Parses `YYYY-MM-DD` in the given calendar.
    pub fn parse(text: &str, calendar: CalendarType) -> Result<Self, HisabError> {
        match calendar {
            CalendarType::Ad => {
                let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
                    HisabError::invalid_input("date", text, format!("Expected YYYY-MM-DD: {}", e))
                })?;
                Ok(DateInput::Ad(date.and_time(chrono::NaiveTime::MIN)))
            }
            CalendarType::Bs => text.parse().map(DateInput::Bs).map_err(|e: HisabError| {
                HisabError::invalid_input("date", text, format!("Invalid Bikram Sambat date provided: {}", e))
            }),
        }
    }

    pub fn calendar(&self) -> CalendarType {
        match self {
            DateInput::Ad(_) => CalendarType::Ad,
            DateInput::Bs(_) => CalendarType::Bs,
        }
    }

    /// Resolves to the canonical Gregorian instant.
    pub fn resolve(&self) -> Result<NaiveDateTime, HisabError> {
        match self {
            DateInput::Ad(instant) => Ok(*instant),
            DateInput::Bs(date) => date.to_gregorian(),
        }
    }
}

/// Resolves a required date field, naming the field in the error.
pub(crate) fn resolve_required(input: Option<&DateInput>, field: &str) -> Result<NaiveDateTime, HisabError> {
    input
        .ok_or_else(|| HisabError::invalid_input(field, "missing", format!("{} is required", field)))?
        .resolve()
}

impl From<NaiveDateTime> for DateInput {
    fn from(instant: NaiveDateTime) -> Self {
        DateInput::Ad(instant)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Ad(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<BsDate> for DateInput {
    fn from(date: BsDate) -> Self {
        DateInput::Bs(date)
    }
}
