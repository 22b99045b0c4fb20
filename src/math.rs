//! Overflow-checked decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::ops::Deref;

use crate::types::HisabError;

/// `Decimal` wrapper whose operations return [`HisabError::Overflow`]
/// instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeDecimal(Decimal);

impl SafeDecimal {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn safe_add(self, rhs: Decimal) -> Result<Self, HisabError> {
        self.0.checked_add(rhs).map(Self).ok_or_else(|| HisabError::overflow("add"))
    }

    pub fn safe_sub(self, rhs: Decimal) -> Result<Self, HisabError> {
        self.0.checked_sub(rhs).map(Self).ok_or_else(|| HisabError::overflow("sub"))
    }

    pub fn safe_mul(self, rhs: Decimal) -> Result<Self, HisabError> {
        self.0.checked_mul(rhs).map(Self).ok_or_else(|| HisabError::overflow("mul"))
    }

    pub fn safe_div(self, rhs: Decimal) -> Result<Self, HisabError> {
        self.0.checked_div(rhs).map(Self).ok_or_else(|| HisabError::overflow("div"))
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl Deref for SafeDecimal {
    type Target = Decimal;

    fn deref(&self) -> &Decimal {
        &self.0
    }
}

/// Converts an `f64` growth factor into a `Decimal`, failing on NaN,
/// infinity or values outside the `Decimal` range.
pub fn decimal_from_f64(value: f64, operation: &str) -> Result<Decimal, HisabError> {
    Decimal::from_f64(value).ok_or_else(|| HisabError::overflow(operation))
}
