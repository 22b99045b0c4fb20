//! # Interest Engine
//!
//! Two independent formulas:
//! - **Compound interest** over a date range, using a fixed 365-day year and
//!   a real-valued exponent: `principal * (1 + rate) ^ (days / 365)`.
//!   Elapsed fractions of a year compound fractionally; there is no
//!   period-by-period stepping.
//! - **Simple bank interest** over a day count:
//!   `principal * rate% * days / (100 * year_days)`.
//!
//! The bare functions perform no input validation. The calculator types
//! wrap them with the checks a form would apply (non-negative amounts,
//! start before end, calendar conversion).

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::config::{DEFAULT_YEAR_DAYS, HisabConfig};
use crate::calendar::gregorian::ceil_days_between;
use crate::hisab_calculator;
use crate::inputs::{DateInput, IntoMoney, resolve_required};
use crate::math::{SafeDecimal, decimal_from_f64};
use crate::traits::Calculate;
use crate::types::{BankInterestResult, CalculationStep, HisabError, InterestResult, SimpleInterestResult};

/// Day count of the compound-interest year. Leap years are not special.
pub const COMPOUND_YEAR_DAYS: f64 = 365.0;

/// Compound interest between two instants.
///
/// A zero or negative range yields `duration_days == 0` and
/// `total_amount == principal`. Callers that need `start < end` must check
/// it themselves (see [`CompoundInterestCalculator`]).
///
/// The only error is [`HisabError::Overflow`] when the grown amount does
/// not fit in a `Decimal`.
pub fn compound_interest(
    principal: Decimal,
    rate_percent: Decimal,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<InterestResult, HisabError> {
    let duration_days = ceil_days_between(start, end).max(0);
    let years = duration_days as f64 / COMPOUND_YEAR_DAYS;

    let rate = *SafeDecimal::new(rate_percent).safe_div(dec!(100))?;
    let rate_f64 = rate.to_f64().ok_or_else(|| HisabError::overflow("rate_to_f64"))?;
    let growth = decimal_from_f64((1.0 + rate_f64).powf(years), "compound_growth")?;

    let total_amount = *SafeDecimal::new(principal).safe_mul(growth)?;
    let interest_amount = *SafeDecimal::new(total_amount).safe_sub(principal)?;
    let compounding_periods = years.round() as i64;

    let trace = vec![
        CalculationStep::initial("Principal", principal),
        CalculationStep::rate("Annual Rate", rate),
        CalculationStep::info(format!(
            "Duration: {} days = {:.4} years of {} days",
            duration_days, years, COMPOUND_YEAR_DAYS
        )),
        CalculationStep::rate("Growth Factor (1 + rate) ^ years", growth),
        CalculationStep::result("Total Amount", total_amount),
        CalculationStep::result("Interest Earned", interest_amount),
    ];

    tracing::debug!(
        %principal,
        %rate_percent,
        duration_days,
        %total_amount,
        "Compound interest calculated"
    );

    Ok(InterestResult {
        total_amount,
        interest_amount,
        principal,
        rate_percent,
        duration_days,
        compounding_periods: Some(compounding_periods),
        label: None,
        calculation_trace: trace,
    })
}

/// Simple (bank) interest over `days` days on a `year_days` basis.
///
/// `year_days` defaults to 365. No rounding is applied.
pub fn simple_bank_interest(
    principal: Decimal,
    rate_percent: Decimal,
    days: i64,
    year_days: Option<u32>,
) -> Result<SimpleInterestResult, HisabError> {
    let year_days = year_days.unwrap_or(DEFAULT_YEAR_DAYS);
    if year_days == 0 {
        return Err(HisabError::invalid_input("year_days", year_days, "Day-count basis must be positive"));
    }

    let numerator = SafeDecimal::new(principal)
        .safe_mul(rate_percent)?
        .safe_mul(Decimal::from(days))?;
    let denominator = *SafeDecimal::new(dec!(100)).safe_mul(Decimal::from(year_days))?;
    let interest = *numerator.safe_div(denominator)?;
    let total = *SafeDecimal::new(principal).safe_add(interest)?;

    Ok(SimpleInterestResult { interest, total })
}

hisab_calculator! {
    /// Compound interest between two dates entered in either calendar.
    #[derive(Debug, Clone, Default)]
    pub struct CompoundInterestCalculator {
        pub principal: Decimal,
        pub rate_percent: Decimal,
        pub start: Option<DateInput>,
        pub end: Option<DateInput>,
    }
}

impl CompoundInterestCalculator {
    pub fn principal(mut self, principal: impl IntoMoney) -> Self {
        if let Some(p) = self.note_input(principal.into_money()) {
            self.principal = p;
        }
        self
    }

    /// Annual rate in percent, e.g. `10` for 10%.
    pub fn rate(mut self, rate_percent: impl IntoMoney) -> Self {
        if let Some(r) = self.note_input(rate_percent.into_money()) {
            self.rate_percent = r;
        }
        self
    }

    pub fn start(mut self, date: impl Into<DateInput>) -> Self {
        self.start = Some(date.into());
        self
    }

    pub fn end(mut self, date: impl Into<DateInput>) -> Self {
        self.end = Some(date.into());
        self
    }

    fn run(&self) -> Result<InterestResult, HisabError> {
        self.check_inputs()?;

        if self.principal < Decimal::ZERO {
            return Err(HisabError::invalid_input("principal", self.principal, "Principal must be non-negative"));
        }
        if self.rate_percent < Decimal::ZERO {
            return Err(HisabError::invalid_input("rate", self.rate_percent, "Interest rate must be non-negative"));
        }

        let start = resolve_required(self.start.as_ref(), "start_date")?;
        let end = resolve_required(self.end.as_ref(), "end_date")?;

        if start >= end {
            tracing::warn!(%start, %end, "Rejected compound interest range");
            return Err(HisabError::validation("Start date must be earlier than end date."));
        }

        let result = compound_interest(self.principal, self.rate_percent, start, end)?;
        Ok(match &self.label {
            Some(label) => result.with_label(label.clone()),
            None => result,
        })
    }
}

impl Calculate for CompoundInterestCalculator {
    type Output = InterestResult;

    fn calculate(&self, _config: &HisabConfig) -> Result<InterestResult, HisabError> {
        self.run().map_err(|e| e.with_optional_source(self.label.as_deref()))
    }

    fn get_label(&self) -> Option<String> {
        self.label.clone()
    }
}

hisab_calculator! {
    /// Simple bank interest over an explicit day count or a date range.
    #[derive(Debug, Clone, Default)]
    pub struct BankInterestCalculator {
        pub principal: Decimal,
        pub rate_percent: Decimal,
        /// Takes precedence over `start`/`end` when set.
        pub days: Option<i64>,
        pub start: Option<DateInput>,
        pub end: Option<DateInput>,
        /// Overrides [`HisabConfig::year_days`].
        pub year_days: Option<u32>,
    }
}

impl BankInterestCalculator {
    pub fn principal(mut self, principal: impl IntoMoney) -> Self {
        if let Some(p) = self.note_input(principal.into_money()) {
            self.principal = p;
        }
        self
    }

    pub fn rate(mut self, rate_percent: impl IntoMoney) -> Self {
        if let Some(r) = self.note_input(rate_percent.into_money()) {
            self.rate_percent = r;
        }
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days = Some(days);
        self
    }

    pub fn start(mut self, date: impl Into<DateInput>) -> Self {
        self.start = Some(date.into());
        self
    }

    pub fn end(mut self, date: impl Into<DateInput>) -> Self {
        self.end = Some(date.into());
        self
    }

    pub fn year_days(mut self, year_days: u32) -> Self {
        self.year_days = Some(year_days);
        self
    }

    /// Day count used for the calculation: the explicit count, or the
    /// range length rounded up and floored at zero.
    pub fn duration_days(&self) -> Result<i64, HisabError> {
        if let Some(days) = self.days {
            return Ok(days);
        }
        let start = resolve_required(self.start.as_ref(), "start_date")?;
        let end = resolve_required(self.end.as_ref(), "end_date")?;
        Ok(ceil_days_between(start, end).max(0))
    }

    fn run(&self, config: &HisabConfig) -> Result<BankInterestResult, HisabError> {
        self.check_inputs()?;

        let days = self.duration_days()?;
        if self.principal <= Decimal::ZERO {
            return Err(HisabError::validation("Principal must be greater than zero"));
        }
        if self.rate_percent <= Decimal::ZERO {
            return Err(HisabError::validation("Interest rate must be greater than zero"));
        }
        if days <= 0 {
            tracing::warn!(days, "Rejected bank interest duration");
            return Err(HisabError::validation("Duration must be at least one day"));
        }

        let year_days = self.year_days.unwrap_or(config.year_days);
        let SimpleInterestResult { interest, total } =
            simple_bank_interest(self.principal, self.rate_percent, days, Some(year_days))?;

        let trace = vec![
            CalculationStep::initial("Principal", self.principal),
            CalculationStep::rate("Annual Rate (%)", self.rate_percent),
            CalculationStep::info(format!("Duration: {} days on a {}-day year", days, year_days)),
            CalculationStep::add("Interest Earned", interest),
            CalculationStep::result("Total Amount", total),
        ];

        tracing::debug!(principal = %self.principal, days, year_days, %interest, "Bank interest calculated");

        Ok(BankInterestResult {
            principal: self.principal,
            rate_percent: self.rate_percent,
            days,
            year_days,
            interest,
            total,
            label: self.label.clone(),
            calculation_trace: trace,
        })
    }
}

impl Calculate for BankInterestCalculator {
    type Output = BankInterestResult;

    fn calculate(&self, config: &HisabConfig) -> Result<BankInterestResult, HisabError> {
        self.run(config).map_err(|e| e.with_optional_source(self.label.as_deref()))
    }

    fn get_label(&self) -> Option<String> {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_compound_one_year_at_ten_percent() {
        let res = compound_interest(dec!(100000), dec!(10), day(2023, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(res.duration_days, 365);
        assert_eq!(res.compounding_periods, Some(1));
        assert!((res.total_amount - dec!(110000)).abs() < dec!(0.01));
        assert!((res.interest_amount - dec!(10000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_compound_zero_duration() {
        let res = compound_interest(dec!(5000), dec!(12), day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(res.duration_days, 0);
        assert_eq!(res.total_amount, dec!(5000));
        assert_eq!(res.interest_amount, Decimal::ZERO);
        assert_eq!(res.compounding_periods, Some(0));
    }

    #[test]
    fn test_compound_inverted_range_clamps_to_zero() {
        let res = compound_interest(dec!(5000), dec!(12), day(2024, 6, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(res.duration_days, 0);
        assert_eq!(res.total_amount, dec!(5000));
    }

    #[test]
    fn test_compound_degenerate_inputs() {
        let zero_rate = compound_interest(dec!(5000), Decimal::ZERO, day(2020, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(zero_rate.total_amount, dec!(5000));
        assert_eq!(zero_rate.interest_amount, Decimal::ZERO);

        let zero_principal = compound_interest(Decimal::ZERO, dec!(8), day(2020, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(zero_principal.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_compound_uses_fractional_years() {
        // 730 days -> exactly 2 years, compounded: 1000 * 1.1^2 = 1210.
        let two_years = compound_interest(dec!(1000), dec!(10), day(2021, 1, 1), day(2023, 1, 1)).unwrap();
        assert!((two_years.total_amount - dec!(1210)).abs() < dec!(0.0001));

        // Half a year grows by sqrt(1.1), not by 5%.
        let half = compound_interest(dec!(1000), dec!(10), day(2021, 1, 1), day(2021, 1, 1) + chrono::Duration::hours(4380)).unwrap();
        assert_eq!(half.duration_days, 183);
        assert!(half.total_amount < dec!(1050));
        assert!(half.total_amount > dec!(1048));
    }

    #[test]
    fn test_compound_partial_day_rounds_up() {
        let start = day(2024, 1, 1);
        let end = start + chrono::Duration::hours(25);
        let res = compound_interest(dec!(1000), dec!(5), start, end).unwrap();
        assert_eq!(res.duration_days, 2);
    }

    #[test]
    fn test_compound_overflow_is_reported() {
        let res = compound_interest(Decimal::MAX, dec!(100), day(2000, 1, 1), day(2024, 1, 1));
        assert!(matches!(res, Err(HisabError::Overflow { .. })));
    }

    #[test]
    fn test_simple_interest_reference_example() {
        let res = simple_bank_interest(dec!(100000), dec!(10), 365, Some(365)).unwrap();
        assert_eq!(res.interest, dec!(10000));
        assert_eq!(res.total, dec!(110000));
    }

    #[test]
    fn test_simple_interest_defaults_to_365_days() {
        let res = simple_bank_interest(dec!(50000), dec!(7.3), 30, None).unwrap();
        // 50000 * 7.3 * 30 / 36500 = 300
        assert_eq!(res.interest, dec!(300));
        assert_eq!(res.total, dec!(50300));
    }

    #[test]
    fn test_simple_interest_is_not_rounded() {
        let res = simple_bank_interest(dec!(1000), dec!(5), 1, Some(365)).unwrap();
        // 5000 / 36500 = 0.136986...
        assert!(res.interest > dec!(0.1369) && res.interest < dec!(0.1370));
        assert!(res.interest.scale() > 2);
        assert!(simple_bank_interest(dec!(1000), dec!(5), 1, Some(0)).is_err());
    }

    #[test]
    fn test_calculator_rejects_inverted_range() {
        let calc = CompoundInterestCalculator::new()
            .principal(1000)
            .rate(10)
            .start(day(2024, 6, 1))
            .end(day(2024, 6, 1))
            .label("Savings");
        let err = calc.calculate(&HisabConfig::default()).unwrap_err();
        assert!(matches!(err, HisabError::Validation { .. }));
        assert!(err.to_string().contains("Savings"));
    }

    #[test]
    fn test_calculator_reports_bad_amount_from_setter() {
        let calc = CompoundInterestCalculator::new()
            .principal("lots")
            .rate(10)
            .start(day(2023, 1, 1))
            .end(day(2024, 1, 1));
        let err = calc.calculate(&HisabConfig::default()).unwrap_err();
        assert!(matches!(err, HisabError::InvalidInput { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_calculators_report_their_label() {
        let compound = CompoundInterestCalculator::new().label("Fixed Deposit");
        assert_eq!(compound.get_label().as_deref(), Some("Fixed Deposit"));
        assert_eq!(BankInterestCalculator::new().get_label(), None);
    }

    #[test]
    fn test_bank_calculator_uses_config_year_days() {
        let config = HisabConfig::default().with_year_days(360);
        let res = BankInterestCalculator::new()
            .principal(36000)
            .rate(10)
            .days(30)
            .calculate(&config)
            .unwrap();
        // 36000 * 10 * 30 / 36000 = 300
        assert_eq!(res.interest, dec!(300));
        assert_eq!(res.year_days, 360);
    }

    #[test]
    fn test_bank_calculator_requires_positive_inputs() {
        let config = HisabConfig::default();
        let zero_rate = BankInterestCalculator::new().principal(1000).rate(0).days(10).calculate(&config);
        assert!(matches!(zero_rate, Err(HisabError::Validation { .. })));

        let empty_range = BankInterestCalculator::new()
            .principal(1000)
            .rate(5)
            .start(day(2024, 1, 10))
            .end(day(2024, 1, 1))
            .calculate(&config);
        assert!(matches!(empty_range, Err(HisabError::Validation { .. })));
    }
}
