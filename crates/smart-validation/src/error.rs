//! Validation error types and handling

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// A single failed rule for a specific field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Name of the rule that produced the error (`required`, `unique`, ...)
    pub code: String,
}

impl ValidationError {
    /// Create a new validation error with the generic code
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation_failed".to_string(),
        }
    }

    /// Create a validation error tagged with the rule that produced it
    pub fn with_code(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }

    /// Replace the message, keeping field and code
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of validation errors keyed by field, in the order each
/// field's rules reported them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Error)]
pub struct ValidationErrors {
    pub errors: HashMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Add a single validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    /// Add a simple validation error with field and message
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Total number of errors across all fields
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    pub fn get_field_errors(&self, field: &str) -> Option<&Vec<ValidationError>> {
        self.errors.get(field)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.get(field).map(|e| !e.is_empty()).unwrap_or(false)
    }

    /// First message recorded for `field`
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|errors| errors.first())
            .map(|error| error.message.as_str())
    }

    /// Field name to ordered message strings, the shape views and API
    /// responses consume
    pub fn messages(&self) -> HashMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(field, errors)| {
                (field.clone(), errors.iter().map(|e| e.message.clone()).collect())
            })
            .collect()
    }

    /// Every message, ordered by field name
    pub fn all_messages(&self) -> Vec<String> {
        let mut fields: Vec<&String> = self.errors.keys().collect();
        fields.sort();
        fields
            .into_iter()
            .flat_map(|field| self.errors[field].iter().map(|e| e.message.clone()))
            .collect()
    }

    /// Merge another collection into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors
                .entry(field)
                .or_default()
                .extend(errors);
        }
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn from_error(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }

    /// Convert to a JSON body for API responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": self.messages()
            }
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "No validation errors");
        }
        write!(f, "Validation failed for {} field(s):", self.errors.len())?;
        let mut fields: Vec<&String> = self.errors.keys().collect();
        fields.sort();
        for field in fields {
            for error in &self.errors[field] {
                write!(f, "\n  {}: {}", field, error.message)?;
            }
        }
        Ok(())
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

/// Malformed rule strings or parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("Unknown validation rule '{0}'")]
    UnknownRule(String),

    #[error("Rule '{rule}' expects {expected}, got {actual} parameter(s)")]
    ParameterCount {
        rule: String,
        expected: String,
        actual: usize,
    },

    #[error("Rule '{rule}' has invalid parameter '{value}': {reason}")]
    InvalidParameter {
        rule: String,
        value: String,
        reason: String,
    },
}

impl RuleParseError {
    pub fn parameter_count(rule: &str, expected: impl Into<String>, actual: usize) -> Self {
        Self::ParameterCount {
            rule: rule.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn invalid_parameter(rule: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of the backing store while checking uniqueness
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Presence lookup on '{table}.{column}' failed: {message}")]
pub struct PresenceError {
    pub table: String,
    pub column: String,
    pub message: String,
}
