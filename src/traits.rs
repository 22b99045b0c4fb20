use crate::config::HisabConfig;
use crate::types::HisabError;

/// Trait implemented by every calculator.
pub trait Calculate {
    type Output;

    /// Runs the calculation against the given configuration.
    fn calculate(&self, config: &HisabConfig) -> Result<Self::Output, HisabError>;

    /// Returns the label of the calculation, if any.
    fn get_label(&self) -> Option<String> {
        None
    }
}
