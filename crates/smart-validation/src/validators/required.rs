//! Presence validators: `required` and `accepted`

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

/// Ensures a field is present and not empty
#[derive(Debug, Clone, Default)]
pub struct RequiredValidator;

impl RequiredValidator {
    pub fn new() -> Self {
        Self
    }

    fn is_empty(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(arr) => arr.is_empty(),
            Value::Object(obj) => obj.is_empty(),
            _ => false,
        }
    }
}

#[async_trait]
impl ValidationRule for RequiredValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        if Self::is_empty(value) {
            let message = format!("The {} field is required.", display_name(field));
            Err(ValidationError::with_code(field, message, "required").into())
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &str {
        "required"
    }

    fn is_implicit(&self) -> bool {
        true
    }
}

/// Terms-of-service style checkbox: `yes`, `on`, `1` or `true`
#[derive(Debug, Clone, Default)]
pub struct AcceptedValidator;

impl AcceptedValidator {
    pub fn new() -> Self {
        Self
    }

    fn is_accepted(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => matches!(s.to_lowercase().as_str(), "yes" | "on" | "1" | "true"),
            _ => false,
        }
    }
}

#[async_trait]
impl ValidationRule for AcceptedValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        if Self::is_accepted(value) {
            Ok(())
        } else {
            let message = format!("The {} must be accepted.", display_name(field));
            Err(ValidationError::with_code(field, message, "accepted").into())
        }
    }

    fn rule_name(&self) -> &str {
        "accepted"
    }

    fn is_implicit(&self) -> bool {
        true
    }
}
