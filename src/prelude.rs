//! Prelude module for hisab
//!
//! This module re-exports commonly used structs, traits, and functions.
//!
//! # Usage
//!
//! ```rust
//! use hisab::prelude::*;
//! ```

// Core exports
pub use crate::builder::{ConfigBuilder, Validate};
pub use crate::config::{HisabConfig, LeapDayPolicy};
pub use crate::inputs::{DateInput, IntoMoney};
pub use crate::traits::Calculate;
pub use crate::types::{
    AgeResult, BankInterestResult, CalculationStep, HisabError, InterestResult, NextBirthday, SimpleInterestResult,
};

// Engines
pub use crate::age::{compute_age, compute_age_with_policy, AgeCalculator};
pub use crate::calendar::{to_bikram_sambat, to_bikram_sambat_date, to_gregorian, BsDate, CalendarType};
pub use crate::interest::{compound_interest, simple_bank_interest, BankInterestCalculator, CompoundInterestCalculator};
