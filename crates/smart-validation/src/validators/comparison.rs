//! Cross-field validators: `confirmed`, `same`, `different`

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Confirmed,
    Same,
    Different,
}

/// Compares a field against another field of the same data
#[derive(Debug, Clone)]
pub struct FieldComparisonValidator {
    comparison: Comparison,
    other: String,
}

impl FieldComparisonValidator {
    /// `password` must equal `password_confirmation`
    pub fn confirmed(field: &str) -> Self {
        Self {
            comparison: Comparison::Confirmed,
            other: format!("{}_confirmation", field),
        }
    }

    pub fn same(other: impl Into<String>) -> Self {
        Self {
            comparison: Comparison::Same,
            other: other.into(),
        }
    }

    pub fn different(other: impl Into<String>) -> Self {
        Self {
            comparison: Comparison::Different,
            other: other.into(),
        }
    }

    pub fn other_field(&self) -> &str {
        &self.other
    }
}

#[async_trait]
impl ValidationRule for FieldComparisonValidator {
    async fn validate(&self, field: &str, value: &Value, data: &Data) -> ValidationResult<()> {
        let other = data.get(&self.other).unwrap_or(&Value::Null);
        let equal = value == other;

        let (passes, message) = match self.comparison {
            Comparison::Confirmed => (
                equal,
                format!("The {} confirmation does not match.", display_name(field)),
            ),
            Comparison::Same => (
                equal,
                format!(
                    "The {} and {} must match.",
                    display_name(field),
                    display_name(&self.other)
                ),
            ),
            Comparison::Different => (
                !equal,
                format!(
                    "The {} and {} must be different.",
                    display_name(field),
                    display_name(&self.other)
                ),
            ),
        };

        if passes {
            Ok(())
        } else {
            Err(ValidationError::with_code(field, message, self.rule_name()).into())
        }
    }

    fn rule_name(&self) -> &str {
        match self.comparison {
            Comparison::Confirmed => "confirmed",
            Comparison::Same => "same",
            Comparison::Different => "different",
        }
    }

    fn replacements(&self) -> Vec<(&'static str, String)> {
        vec![(":other", display_name(&self.other))]
    }
}
