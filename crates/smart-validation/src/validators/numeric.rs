//! Numeric type validators: `numeric` and `integer`

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

/// Accepts JSON numbers and numeric strings
#[derive(Debug, Clone, Default)]
pub struct NumericValidator {
    /// Reject values with a fractional part
    pub integer_only: bool,
}

impl NumericValidator {
    pub fn new() -> Self {
        Self {
            integer_only: false,
        }
    }

    pub fn integer() -> Self {
        Self { integer_only: true }
    }

    fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) if self.integer_only => n.is_i64() || n.is_u64(),
            Value::Number(_) => true,
            Value::String(s) if self.integer_only => s.trim().parse::<i64>().is_ok(),
            Value::String(s) => s.trim().parse::<f64>().map(|v| v.is_finite()).unwrap_or(false),
            _ => false,
        }
    }
}

#[async_trait]
impl ValidationRule for NumericValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        if self.accepts(value) {
            return Ok(());
        }
        let message = if self.integer_only {
            format!("The {} must be an integer.", display_name(field))
        } else {
            format!("The {} must be a number.", display_name(field))
        };
        Err(ValidationError::with_code(field, message, self.rule_name()).into())
    }

    fn rule_name(&self) -> &str {
        if self.integer_only {
            "integer"
        } else {
            "numeric"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_numeric_accepts_numbers_and_numeric_strings() {
        let validator = NumericValidator::new();
        let data = Data::new();

        assert!(validator.validate("price", &json!(9.99), &data).await.is_ok());
        assert!(validator.validate("price", &json!(" 12.5 "), &data).await.is_ok());
        assert!(validator.validate("price", &json!("twelve"), &data).await.is_err());
        assert!(validator.validate("price", &json!(true), &data).await.is_err());
    }

    #[tokio::test]
    async fn test_integer_rejects_fractions() {
        let validator = NumericValidator::integer();
        let data = Data::new();

        assert!(validator.validate("qty", &json!(3), &data).await.is_ok());
        assert!(validator.validate("qty", &json!("3"), &data).await.is_ok());
        let errors = validator.validate("qty", &json!(3.5), &data).await.unwrap_err();
        assert_eq!(errors.first("qty"), Some("The qty must be an integer."));
        assert!(validator.validate("qty", &json!("3.5"), &data).await.is_err());
    }
}
