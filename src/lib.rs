//! # hisab
//!
//! Pure calculation core for three everyday financial tools:
//!
//! - [`interest::compound_interest`]: compound interest over a date range
//! - [`interest::simple_bank_interest`]: simple (bank) interest over a day count
//! - [`age::compute_age`]: civil-field age with next-birthday countdown
//!
//! Each accepts Gregorian dates or Bikram Sambat dates through
//! [`calendar`], which converts using an embedded era table.
//!
//! ```rust
//! use hisab::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let result = simple_bank_interest(dec!(100000), dec!(10), 365, None).unwrap();
//! assert_eq!(result.total, dec!(110000));
//! ```

pub mod age;
pub mod builder;
pub mod calendar;
pub mod config;
pub mod inputs;
pub mod interest;
pub mod macros;
pub mod math;
pub mod prelude;
pub mod traits;
pub mod types;

pub use config::{HisabConfig, LeapDayPolicy};
pub use traits::Calculate;
pub use types::{AgeResult, HisabError, InterestResult};
