//! Email format validator

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Validator for email address format. Requires a dotted domain.
#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn is_valid_email(candidate: &str) -> bool {
        candidate.len() <= 254 && !candidate.contains("..") && EMAIL_PATTERN.is_match(candidate)
    }
}

#[async_trait]
impl ValidationRule for EmailValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        let valid = value.as_str().map(Self::is_valid_email).unwrap_or(false);
        if valid {
            Ok(())
        } else {
            let message = format!("The {} must be a valid email address.", display_name(field));
            Err(ValidationError::with_code(field, message, "email").into())
        }
    }

    fn rule_name(&self) -> &str {
        "email"
    }
}
