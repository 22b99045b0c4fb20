use crate::types::HisabError;

/// Trait for builders that can check their state before building.
pub trait Validate {
    fn validate(&self) -> Result<(), HisabError>;
}

/// Trait for builders that produce a configuration or calculator.
///
/// This creates a unified interface for object creation across the crate.
pub trait ConfigBuilder<T> {
    /// Builds the final object, returning a Result.
    fn build(self) -> Result<T, HisabError>;
}
