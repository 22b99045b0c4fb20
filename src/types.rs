use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_DISPLAY_PRECISION;

/// The kind of arithmetic performed by a [`CalculationStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Initial => " ",
            Operation::Add => "+",
            Operation::Rate => "x",
            Operation::Result => "=",
            Operation::Info => " ",
        }
    }
}

/// Represents a single step in an interest calculation.
///
/// Results keep the list of steps so a caller can show how the final
/// amount was derived without re-running the formula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Initial,
        }
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Add,
        }
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(rate),
            operation: Operation::Rate,
        }
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Result,
        }
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount: None,
            operation: Operation::Info,
        }
    }
}

/// Rounds an amount for display. Calculations themselves never round.
pub fn format_decimal(amount: Decimal, precision: u32) -> String {
    use rust_decimal::RoundingStrategy;
    let rounded = amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

fn render_trace(output: &mut String, title: &str, trace: &[CalculationStep], precision: u32) {
    use std::fmt::Write;

    let _ = writeln!(output, "{}", title);
    let _ = writeln!(output, "{:-<50}", "");

    let width = trace
        .iter()
        .map(|step| step.description.len())
        .max()
        .unwrap_or(20)
        .max(20);

    for step in trace {
        match (step.operation, step.amount) {
            (Operation::Info, _) | (_, None) => {
                let _ = writeln!(output, "  INFO: {}", step.description);
            }
            (Operation::Rate, Some(amount)) => {
                let _ = writeln!(
                    output,
                    "  {:<width$} : {} {:>14}",
                    step.description,
                    step.operation.symbol(),
                    format_decimal(amount, precision.max(4)),
                    width = width
                );
            }
            (op, Some(amount)) => {
                let _ = writeln!(
                    output,
                    "  {:<width$} : {} {:>14}",
                    step.description,
                    op.symbol(),
                    format_decimal(amount, precision),
                    width = width
                );
            }
        }
    }

    let _ = writeln!(output, "{:-<50}", "");
}

/// Result of a compound interest calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterestResult {
    pub total_amount: Decimal,
    pub interest_amount: Decimal,
    pub principal: Decimal,
    pub rate_percent: Decimal,
    /// Whole days between start and end, rounded up and never negative.
    pub duration_days: i64,
    /// Display-only count of elapsed years. Not used in the amount formula.
    pub compounding_periods: Option<i64>,
    pub label: Option<String>,
    pub calculation_trace: Vec<CalculationStep>,
}

impl InterestResult {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the total amount rounded to `precision` decimal places.
    pub fn format_amount(&self, precision: u32) -> String {
        format_decimal(self.total_amount, precision)
    }

    /// Format: "{Label}: {principal} -> {total} over {days} days"
    pub fn summary(&self) -> String {
        self.summary_with(DEFAULT_DISPLAY_PRECISION)
    }

    pub fn summary_with(&self, precision: u32) -> String {
        let label = self.label.as_deref().unwrap_or("Compound Interest");
        format!(
            "{}: {} -> {} over {} days",
            label,
            format_decimal(self.principal, precision),
            self.format_amount(precision),
            self.duration_days
        )
    }

    /// Step-by-step breakdown of how `total_amount` was derived.
    pub fn explain(&self) -> String {
        self.explain_with(DEFAULT_DISPLAY_PRECISION)
    }

    /// [`explain`](Self::explain) with amounts shown to `precision` places.
    /// Rates always keep at least four.
    pub fn explain_with(&self, precision: u32) -> String {
        let mut output = String::new();
        let label = self.label.as_deref().unwrap_or("Compound Interest");
        render_trace(&mut output, &format!("Explanation for '{}':", label), &self.calculation_trace, precision);
        output.push_str(&format!("Interest Earned: {}\n", format_decimal(self.interest_amount, precision)));
        output.push_str(&format!("Total Amount: {}\n", self.format_amount(precision)));
        output
    }
}

/// Amounts use the formatter precision when given (`{:.4}`), otherwise two places.
fn display_precision(f: &std::fmt::Formatter<'_>) -> u32 {
    f.precision()
        .and_then(|p| u32::try_from(p).ok())
        .unwrap_or(DEFAULT_DISPLAY_PRECISION)
}

impl std::fmt::Display for InterestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = display_precision(f);
        writeln!(f, "Principal: {} | Rate: {}% per annum", format_decimal(self.principal, precision), self.rate_percent)?;
        write!(f, "Duration: {} days", self.duration_days)?;
        if let Some(periods) = self.compounding_periods {
            write!(f, " ({} compounding periods)", periods)?;
        }
        writeln!(f)?;
        write!(
            f,
            "Interest: {} | Total: {}",
            format_decimal(self.interest_amount, precision),
            self.format_amount(precision)
        )
    }
}

/// Output of the bare simple-interest formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimpleInterestResult {
    pub interest: Decimal,
    pub total: Decimal,
}

/// Result of a bank (simple) interest calculation over a date range or day count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankInterestResult {
    pub principal: Decimal,
    pub rate_percent: Decimal,
    pub days: i64,
    pub year_days: u32,
    pub interest: Decimal,
    pub total: Decimal,
    pub label: Option<String>,
    pub calculation_trace: Vec<CalculationStep>,
}

impl BankInterestResult {
    pub fn format_amount(&self, precision: u32) -> String {
        format_decimal(self.total, precision)
    }

    pub fn summary(&self) -> String {
        self.summary_with(DEFAULT_DISPLAY_PRECISION)
    }

    pub fn summary_with(&self, precision: u32) -> String {
        let label = self.label.as_deref().unwrap_or("Bank Interest");
        format!(
            "{}: {} interest on {} over {} days",
            label,
            format_decimal(self.interest, precision),
            format_decimal(self.principal, precision),
            self.days
        )
    }

    pub fn explain(&self) -> String {
        self.explain_with(DEFAULT_DISPLAY_PRECISION)
    }

    pub fn explain_with(&self, precision: u32) -> String {
        let mut output = String::new();
        let label = self.label.as_deref().unwrap_or("Bank Interest");
        render_trace(&mut output, &format!("Explanation for '{}':", label), &self.calculation_trace, precision);
        output.push_str(&format!("Interest Earned: {}\n", format_decimal(self.interest, precision)));
        output.push_str(&format!("Total Amount: {}\n", self.format_amount(precision)));
        output
    }
}

impl std::fmt::Display for BankInterestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = display_precision(f);
        writeln!(
            f,
            "Principal: {} | Rate: {}% | Duration: {} days",
            format_decimal(self.principal, precision),
            self.rate_percent,
            self.days
        )?;
        write!(f, "Interest: {} | Total: {}", format_decimal(self.interest, precision), self.format_amount(precision))
    }
}

/// Countdown to the next occurrence of a birthday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextBirthday {
    /// Midnight of this day is the birthday instant.
    pub date: NaiveDate,
    pub days_until: i64,
}

/// Civil-field age plus raw elapsed totals, relative to one "now".
///
/// `total_days` is elapsed time, while `years`/`months`/`days` come from
/// calendar-field subtraction. The two are not reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeResult {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub total_months: i32,
    pub next_birthday: NextBirthday,
    pub label: Option<String>,
}

impl std::fmt::Display for AgeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} years, {} months, {} days", self.years, self.months, self.days)?;
        writeln!(
            f,
            "Total: {} days | {} weeks | {} months",
            self.total_days, self.total_weeks, self.total_months
        )?;
        write!(
            f,
            "Next birthday: {} ({} days)",
            self.next_birthday.date, self.next_birthday.days_until
        )
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum HisabError {
    #[error("Invalid Input [{}]: {field} = '{value}': {reason}", .source_label.as_deref().unwrap_or("Unknown"))]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
        source_label: Option<String>,
    },

    #[error("Out of Range [{}]: {field} = '{value}' is outside {coverage}", .source_label.as_deref().unwrap_or("Unknown"))]
    OutOfRange {
        field: String,
        value: String,
        coverage: String,
        source_label: Option<String>,
    },

    #[error("Validation Error [{}]: {reason}", .source_label.as_deref().unwrap_or("Unknown"))]
    Validation {
        reason: String,
        source_label: Option<String>,
    },

    #[error("Configuration Error [{}]: {reason}", .source_label.as_deref().unwrap_or("Unknown"))]
    ConfigurationError {
        reason: String,
        source_label: Option<String>,
    },

    #[error("Arithmetic Overflow [{}]: Operation '{operation}' failed", .source_label.as_deref().unwrap_or("Unknown"))]
    Overflow {
        operation: String,
        source_label: Option<String>,
    },
}

impl HisabError {
    pub fn invalid_input(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        HisabError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
            source_label: None,
        }
    }

    pub fn out_of_range(field: impl Into<String>, value: impl ToString, coverage: impl Into<String>) -> Self {
        HisabError::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            coverage: coverage.into(),
            source_label: None,
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        HisabError::Validation {
            reason: reason.into(),
            source_label: None,
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        HisabError::ConfigurationError {
            reason: reason.into(),
            source_label: None,
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        HisabError::Overflow {
            operation: operation.into(),
            source_label: None,
        }
    }

    /// Attaches the label of the calculator that produced this error.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        let source = Some(source.into());
        match self {
            HisabError::InvalidInput { field, value, reason, .. } => HisabError::InvalidInput { field, value, reason, source_label: source },
            HisabError::OutOfRange { field, value, coverage, .. } => HisabError::OutOfRange { field, value, coverage, source_label: source },
            HisabError::Validation { reason, .. } => HisabError::Validation { reason, source_label: source },
            HisabError::ConfigurationError { reason, .. } => HisabError::ConfigurationError { reason, source_label: source },
            HisabError::Overflow { operation, .. } => HisabError::Overflow { operation, source_label: source },
        }
    }

    /// Same as [`with_source`](Self::with_source) but leaves the error untouched for `None`.
    pub fn with_optional_source(self, source: Option<&str>) -> Self {
        match source {
            Some(label) => self.with_source(label),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display_includes_source() {
        let err = HisabError::validation("Start date must be earlier than end date").with_source("Fixed Deposit");
        assert_eq!(
            err.to_string(),
            "Validation Error [Fixed Deposit]: Start date must be earlier than end date"
        );

        let err = HisabError::invalid_input("month", 13, "Month must be between 1 and 12");
        assert_eq!(err.to_string(), "Invalid Input [Unknown]: month = '13': Month must be between 1 and 12");
    }

    #[test]
    fn test_format_decimal_rounds_half_away_from_zero() {
        assert_eq!(format_decimal(dec!(10.005), 2), "10.01");
        assert_eq!(format_decimal(dec!(110000), 2), "110000.00");
        assert_eq!(format_decimal(dec!(1.23456), 0), "1");
    }

    fn sample_bank_result() -> BankInterestResult {
        BankInterestResult {
            principal: dec!(1000),
            rate_percent: dec!(5),
            days: 1,
            year_days: 365,
            interest: dec!(0.136986301369863),
            total: dec!(1000.136986301369863),
            label: None,
            calculation_trace: vec![
                CalculationStep::initial("Principal", dec!(1000)),
                CalculationStep::rate("Annual Rate (%)", dec!(5)),
                CalculationStep::add("Interest Earned", dec!(0.136986301369863)),
            ],
        }
    }

    #[test]
    fn test_display_helpers_honour_precision() {
        let res = sample_bank_result();

        assert_eq!(res.summary(), "Bank Interest: 0.14 interest on 1000.00 over 1 days");
        assert_eq!(res.summary_with(4), "Bank Interest: 0.1370 interest on 1000.0000 over 1 days");

        let explained = res.explain_with(5);
        assert!(explained.contains("0.13699"));
        assert!(explained.contains("Total Amount: 1000.13699"));
        assert!(res.explain_with(0).contains("Total Amount: 1000\n"));

        assert!(res.to_string().ends_with("Interest: 0.14 | Total: 1000.14"));
        assert!(format!("{:.3}", res).ends_with("Interest: 0.137 | Total: 1000.137"));
    }

    #[test]
    fn test_trace_serializes_operation_as_camel_case() {
        let step = CalculationStep::rate("Annual Rate", dec!(0.1));
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains(r#""operation":"rate""#));
    }
}
