//! # Age Engine
//!
//! Civil-field age between a birth instant and "now", computed by calendar
//! subtraction with borrowing:
//!
//! - day underflow borrows the length of the month *before now's month*
//!   (not the birth month), so results near month ends can differ from
//!   what a day count would suggest, and can even stay negative after the
//!   borrow (e.g. 31 January to 1 March in a common year)
//! - month underflow borrows twelve months from the years
//!
//! Totals (`total_days`, `total_weeks`) come from raw elapsed time and are
//! deliberately not reconciled with the civil breakdown.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::CalendarType;
use crate::calendar::gregorian::{ceil_days_between, days_in_month, floor_days_between};
use crate::config::{HisabConfig, LeapDayPolicy};
use crate::hisab_calculator;
use crate::inputs::{DateInput, resolve_required};
use crate::traits::Calculate;
use crate::types::{AgeResult, HisabError, NextBirthday};

/// Age of someone born at `birth`, as seen at `now`.
///
/// Leap-day birthdays roll forward to 1 March in common years. Use
/// [`compute_age_with_policy`] to choose otherwise.
pub fn compute_age(birth: NaiveDateTime, now: NaiveDateTime) -> Result<AgeResult, HisabError> {
    compute_age_with_policy(birth, now, LeapDayPolicy::default())
}

pub fn compute_age_with_policy(
    birth: NaiveDateTime,
    now: NaiveDateTime,
    policy: LeapDayPolicy,
) -> Result<AgeResult, HisabError> {
    if birth > now {
        return Err(HisabError::invalid_input(
            "birth_date",
            birth.date(),
            "Birth date cannot be in the future",
        ));
    }

    let mut years = now.year() - birth.year();
    let mut months = now.month() as i32 - birth.month() as i32;
    let mut days = now.day() as i32 - birth.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_month(now.year(), now.month() as i32 - 1) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let total_days = floor_days_between(birth, now);
    let total_weeks = total_days.div_euclid(7);
    let total_months = years * 12 + months;

    let next_birthday = next_birthday(birth.date(), now, policy)?;

    tracing::debug!(years, months, days, total_days, days_until = next_birthday.days_until, "Age calculated");

    Ok(AgeResult {
        years,
        months,
        days,
        total_days,
        total_weeks,
        total_months,
        next_birthday,
        label: None,
    })
}

/// The birthday of someone born on `birth` as it falls in `year`.
pub fn birthday_in(birth: NaiveDate, year: i32, policy: LeapDayPolicy) -> Result<NaiveDate, HisabError> {
    if let Some(date) = NaiveDate::from_ymd_opt(year, birth.month(), birth.day()) {
        return Ok(date);
    }

    // Only 29 February can be missing from a year.
    let substitute = match policy {
        LeapDayPolicy::RollForward => NaiveDate::from_ymd_opt(year, 3, 1),
        LeapDayPolicy::ClampToFebruary => NaiveDate::from_ymd_opt(year, 2, 28),
    };
    substitute.ok_or_else(|| HisabError::out_of_range("year", year, "supported Gregorian years"))
}

fn next_birthday(birth: NaiveDate, now: NaiveDateTime, policy: LeapDayPolicy) -> Result<NextBirthday, HisabError> {
    let mut date = birthday_in(birth, now.year(), policy)?;
    if date.and_time(NaiveTime::MIN) < now {
        date = birthday_in(birth, now.year() + 1, policy)?;
    }

    Ok(NextBirthday {
        date,
        days_until: ceil_days_between(now, date.and_time(NaiveTime::MIN)),
    })
}

impl AgeResult {
    /// The next birthday rendered as `YYYY-MM-DD` in `calendar`.
    pub fn next_birthday_in(&self, calendar: CalendarType) -> Result<String, HisabError> {
        calendar.project(self.next_birthday.date.and_time(NaiveTime::MIN))
    }
}

hisab_calculator! {
    /// Age from a birth date entered in either calendar.
    #[derive(Debug, Clone, Default)]
    pub struct AgeCalculator {
        pub birth: Option<DateInput>,
        /// Fixed "now"; the local wall clock is read when unset.
        pub as_of: Option<NaiveDateTime>,
    }
}

impl AgeCalculator {
    pub fn born_on(mut self, date: impl Into<DateInput>) -> Self {
        self.birth = Some(date.into());
        self
    }

    pub fn as_of(mut self, now: NaiveDateTime) -> Self {
        self.as_of = Some(now);
        self
    }

    fn run(&self, config: &HisabConfig) -> Result<AgeResult, HisabError> {
        self.check_inputs()?;

        let birth = resolve_required(self.birth.as_ref(), "birth_date")?;
        let now = self.as_of.unwrap_or_else(|| Local::now().naive_local());

        if birth > now {
            tracing::warn!(%birth, %now, "Rejected birth date in the future");
        }

        let mut result = compute_age_with_policy(birth, now, config.leap_day_policy)?;
        result.label = self.label.clone();
        Ok(result)
    }
}

impl Calculate for AgeCalculator {
    type Output = AgeResult;

    fn calculate(&self, config: &HisabConfig) -> Result<AgeResult, HisabError> {
        self.run(config).map_err(|e| e.with_optional_source(self.label.as_deref()))
    }

    fn get_label(&self) -> Option<String> {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_borrow_from_february_of_a_leap_year() {
        // 10 - 15 = -5, borrow February 2024 (29 days) -> 24.
        let age = compute_age(at(2000, 3, 15, 0), at(2024, 3, 10, 12)).unwrap();
        assert_eq!((age.years, age.months, age.days), (23, 11, 24));
        assert_eq!(age.total_months, 23 * 12 + 11);
    }

    #[test]
    fn test_borrow_in_january_uses_december() {
        let age = compute_age(at(2000, 12, 25, 0), at(2024, 1, 5, 0)).unwrap();
        assert_eq!((age.years, age.months, age.days), (23, 0, 11));
    }

    #[test]
    fn test_borrow_uses_previous_month_not_birth_month() {
        // 1 - 31 = -30, borrow February 2023 (28 days) -> still -2.
        let age = compute_age(at(2023, 1, 31, 0), at(2023, 3, 1, 0)).unwrap();
        assert_eq!((age.years, age.months, age.days), (0, 1, -2));
        assert_eq!(age.total_days, 29);
    }

    #[test]
    fn test_totals_come_from_elapsed_time() {
        let age = compute_age(at(2000, 1, 1, 0), at(2000, 1, 15, 23)).unwrap();
        assert_eq!(age.total_days, 14);
        assert_eq!(age.total_weeks, 2);
        assert_eq!(age.days, 14);
    }

    #[test]
    fn test_future_birth_is_rejected() {
        let now = at(2024, 3, 10, 12);
        let res = compute_age(now + Duration::days(1), now);
        assert!(matches!(res, Err(HisabError::InvalidInput { ref field, .. }) if field == "birth_date"));
    }

    #[test]
    fn test_born_right_now() {
        let now = at(2024, 3, 10, 0);
        let age = compute_age(now, now).unwrap();
        assert_eq!((age.years, age.months, age.days, age.total_days), (0, 0, 0, 0));
        assert_eq!(age.next_birthday.days_until, 0);
        assert_eq!(age.next_birthday.date, now.date());
    }

    #[test]
    fn test_next_birthday_later_this_year() {
        let age = compute_age(at(2000, 3, 15, 0), at(2024, 3, 10, 12)).unwrap();
        assert_eq!(age.next_birthday.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        // 4.5 days rounds up.
        assert_eq!(age.next_birthday.days_until, 5);
    }

    #[test]
    fn test_next_birthday_wraps_to_next_year() {
        let age = compute_age(at(1990, 1, 20, 0), at(2024, 6, 1, 12)).unwrap();
        assert_eq!(age.next_birthday.date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert!(age.next_birthday.days_until > 0);
    }

    #[test]
    fn test_birthday_already_started_today_wraps() {
        let age = compute_age(at(1990, 3, 10, 0), at(2024, 3, 10, 10)).unwrap();
        assert_eq!(age.next_birthday.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(age.next_birthday.days_until, 365);
    }

    #[test]
    fn test_leap_day_birthday_policies() {
        let birth = at(2000, 2, 29, 0);
        let now = at(2023, 1, 10, 0);

        let rolled = compute_age_with_policy(birth, now, LeapDayPolicy::RollForward).unwrap();
        assert_eq!(rolled.next_birthday.date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(rolled.next_birthday.days_until, 50);

        let clamped = compute_age_with_policy(birth, now, LeapDayPolicy::ClampToFebruary).unwrap();
        assert_eq!(clamped.next_birthday.date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(clamped.next_birthday.days_until, 49);
    }

    #[test]
    fn test_leap_day_birthday_next_year_is_rebuilt() {
        // The substitute day has passed; 2024 has a real 29 February.
        let age = compute_age(at(2000, 2, 29, 0), at(2023, 3, 5, 0)).unwrap();
        assert_eq!(age.next_birthday.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_calculator_with_bs_birth_date() {
        use crate::calendar::BsDate;

        let birth = BsDate::new(2081, 1, 1).unwrap(); // 2024-04-13
        let age = AgeCalculator::new()
            .born_on(birth)
            .as_of(at(2025, 4, 13, 0))
            .label("Aarav")
            .calculate(&HisabConfig::default())
            .unwrap();
        assert_eq!((age.years, age.months, age.days), (1, 0, 0));
        assert_eq!(age.total_days, 365);
        assert_eq!(age.label.as_deref(), Some("Aarav"));
        assert_eq!(AgeCalculator::new().label("Aarav").get_label().as_deref(), Some("Aarav"));
        assert_eq!(age.next_birthday_in(CalendarType::Ad).unwrap(), "2025-04-13");
    }

    #[test]
    fn test_calculator_requires_birth_date() {
        let err = AgeCalculator::new().calculate(&HisabConfig::default()).unwrap_err();
        assert!(matches!(err, HisabError::InvalidInput { .. }));
    }
}
