//! Terminal rendering of calculation results.

use colored::Colorize;
use hisab::prelude::*;
use hisab::types::{CalculationStep, Operation, format_decimal};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    description: String,
    #[tabled(rename = "Op")]
    op: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn op_symbol(op: Operation) -> &'static str {
    match op {
        Operation::Add => "+",
        Operation::Rate => "x",
        Operation::Result => "=",
        Operation::Initial | Operation::Info => "",
    }
}

fn trace_table(trace: &[CalculationStep], precision: u32) -> String {
    let rows: Vec<StepRow> = trace
        .iter()
        .map(|step| StepRow {
            description: step.description.clone(),
            op: op_symbol(step.operation),
            value: match (step.operation, step.amount) {
                (_, None) => String::new(),
                // Rates are fractions; two places would hide them.
                (Operation::Rate, Some(rate)) => format_decimal(rate, precision.max(4)),
                (_, Some(amount)) => format_decimal(amount, precision),
            },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn heading(label: Option<&str>, fallback: &str) -> String {
    label.unwrap_or(fallback).bold().cyan().to_string()
}

pub fn interest(result: &InterestResult, precision: u32) -> String {
    let mut out = String::new();
    out.push_str(&heading(result.label.as_deref(), "Compound Interest"));
    out.push('\n');
    out.push_str(&trace_table(&result.calculation_trace, precision));
    out.push('\n');
    out.push_str(&format!(
        "{} {}\n{} {}",
        "Interest:".bold(),
        format_decimal(result.interest_amount, precision).yellow(),
        "Total:".bold(),
        result.format_amount(precision).green().bold()
    ));
    out
}

pub fn bank(result: &BankInterestResult, precision: u32) -> String {
    let mut out = String::new();
    out.push_str(&heading(result.label.as_deref(), "Bank Interest"));
    out.push('\n');
    out.push_str(&trace_table(&result.calculation_trace, precision));
    out.push('\n');
    out.push_str(&format!(
        "{} {}\n{} {}",
        "Interest:".bold(),
        format_decimal(result.interest, precision).yellow(),
        "Total:".bold(),
        result.format_amount(precision).green().bold()
    ));
    out
}

#[derive(Tabled)]
struct AgeRow {
    #[tabled(rename = "Measure")]
    measure: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn age(result: &AgeResult, calendar: CalendarType) -> Result<String, HisabError> {
    let next = result.next_birthday_in(calendar)?;
    let rows = vec![
        AgeRow { measure: "Years", value: result.years.to_string() },
        AgeRow { measure: "Months", value: result.months.to_string() },
        AgeRow { measure: "Days", value: result.days.to_string() },
        AgeRow { measure: "Total months", value: result.total_months.to_string() },
        AgeRow { measure: "Total weeks", value: result.total_weeks.to_string() },
        AgeRow { measure: "Total days", value: result.total_days.to_string() },
    ];

    let mut out = String::new();
    out.push_str(&heading(result.label.as_deref(), "Age"));
    out.push('\n');
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');

    let countdown = match result.next_birthday.days_until {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        n => format!("in {} days", n),
    };
    out.push_str(&format!(
        "{} {} {} ({})",
        "Next birthday:".bold(),
        next.green(),
        countdown,
        calendar.long_name()
    ));
    Ok(out)
}

/// The same day in both calendars.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub ad: String,
    pub bs: String,
    pub bs_month_name: &'static str,
}

impl Conversion {
    pub fn new(bs: BsDate) -> Result<Self, HisabError> {
        let ad = bs.to_gregorian_date()?;
        Ok(Self {
            ad: ad.format("%Y-%m-%d").to_string(),
            bs: bs.to_string(),
            bs_month_name: bs.month_name(),
        })
    }
}

pub fn conversion(conv: &Conversion) -> String {
    format!(
        "{} {}\n{} {} ({})",
        format!("{}:", CalendarType::Ad.long_name()).bold(),
        conv.ad.green(),
        format!("{}:", CalendarType::Bs.long_name()).bold(),
        conv.bs.green(),
        conv.bs_month_name
    )
}
