//! Declarative macros for reducing boilerplate in calculator definitions.

/// Generates a calculator struct with the fields shared by every calculator.
///
/// This macro generates:
/// - The struct definition with user-defined fields plus the common fields
///   (`label`, `input_error`)
/// - A `new()` constructor (requires `Default`)
/// - A `label()` setter
/// - `note_input()` / `check_inputs()`, which let fluent setters swallow a
///   conversion failure and report it later from `calculate()`
///
/// # Usage
///
/// ```rust,ignore
/// hisab_calculator! {
///     #[derive(Debug, Clone, Default)]
///     pub struct MyCalculator {
///         pub principal: Decimal,
///     }
/// }
/// ```
///
/// The user must still implement `Calculate` manually.
#[macro_export]
macro_rules! hisab_calculator {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
            // === Common Fields (auto-generated) ===
            /// Optional label for identifying this calculation in results and errors.
            pub label: Option<String>,
            /// First input that failed to convert in a fluent setter.
            input_error: Option<$crate::types::HisabError>,
        }

        impl $name {
            /// Creates a new instance with default values.
            pub fn new() -> Self {
                Self::default()
            }

            /// Sets an optional label for this calculation.
            pub fn label(mut self, val: impl Into<String>) -> Self {
                self.label = Some(val.into());
                self
            }

            #[allow(dead_code)]
            fn note_input<T>(&mut self, value: Result<T, $crate::types::HisabError>) -> Option<T> {
                match value {
                    Ok(v) => Some(v),
                    Err(e) => {
                        if self.input_error.is_none() {
                            self.input_error = Some(e);
                        }
                        None
                    }
                }
            }

            fn check_inputs(&self) -> Result<(), $crate::types::HisabError> {
                match &self.input_error {
                    Some(e) => Err(e.clone().with_optional_source(self.label.as_deref())),
                    None => Ok(()),
                }
            }
        }
    };
}
