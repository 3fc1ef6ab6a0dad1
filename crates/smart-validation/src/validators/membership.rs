//! List membership validators: `in` and `not_in`

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, value_to_string, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct MembershipValidator {
    values: Vec<String>,
    negate: bool,
}

impl MembershipValidator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            negate: false,
        }
    }

    pub fn none_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            negate: true,
            ..Self::one_of(values)
        }
    }

    fn contains(&self, value: &Value) -> bool {
        match value {
            // every element of an array must be allowed
            Value::Array(items) => {
                !items.is_empty() && items.iter().all(|item| self.contains(item))
            }
            other => {
                let needle = value_to_string(other);
                self.values.iter().any(|candidate| *candidate == needle)
            }
        }
    }
}

#[async_trait]
impl ValidationRule for MembershipValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        if self.contains(value) != self.negate {
            Ok(())
        } else {
            let message = format!("The selected {} is invalid.", display_name(field));
            Err(ValidationError::with_code(field, message, self.rule_name()).into())
        }
    }

    fn rule_name(&self) -> &str {
        if self.negate {
            "not_in"
        } else {
            "in"
        }
    }

    fn replacements(&self) -> Vec<(&'static str, String)> {
        vec![(":values", self.values.join(", "))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_compares_string_forms() {
        let validator = MembershipValidator::one_of(["draft", "published", "1"]);
        let data = Data::new();

        assert!(validator.validate("status", &json!("draft"), &data).await.is_ok());
        assert!(validator.validate("status", &json!(1), &data).await.is_ok());
        let errors = validator.validate("status", &json!("archived"), &data).await.unwrap_err();
        assert_eq!(errors.first("status"), Some("The selected status is invalid."));
    }

    #[tokio::test]
    async fn test_in_checks_every_array_element() {
        let validator = MembershipValidator::one_of(["red", "green"]);
        let data = Data::new();

        assert!(validator.validate("colors", &json!(["red", "green"]), &data).await.is_ok());
        assert!(validator.validate("colors", &json!(["red", "blue"]), &data).await.is_err());
    }

    #[tokio::test]
    async fn test_not_in() {
        let validator = MembershipValidator::none_of(["admin", "root"]);
        let data = Data::new();

        assert!(validator.validate("username", &json!("alice"), &data).await.is_ok());
        assert!(validator.validate("username", &json!("root"), &data).await.is_err());
    }
}
