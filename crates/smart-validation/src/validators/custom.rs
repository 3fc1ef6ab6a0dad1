//! Application-registered rules, looked up by name like the built-ins

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// `(field, value, params, data) -> passes`
pub type CustomCheck = Arc<dyn Fn(&str, &Value, &[String], &Data) -> bool + Send + Sync>;

/// A named rule backed by a closure. The message may use `:attribute`.
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    message: String,
    implicit: bool,
    check: CustomCheck,
}

impl CustomRule {
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, &Value, &[String], &Data) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            implicit: false,
            check: Arc::new(check),
        }
    }

    /// Also run on absent or blank values
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the rule to the parameters of one rule-string occurrence
    pub fn bind(&self, params: &[String]) -> BoundCustomRule {
        BoundCustomRule {
            rule: self.clone(),
            params: params.to_vec(),
        }
    }
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("implicit", &self.implicit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BoundCustomRule {
    rule: CustomRule,
    params: Vec<String>,
}

#[async_trait]
impl ValidationRule for BoundCustomRule {
    async fn validate(&self, field: &str, value: &Value, data: &Data) -> ValidationResult<()> {
        if (self.rule.check)(field, value, &self.params, data) {
            Ok(())
        } else {
            let message = self.rule.message.replace(":attribute", &display_name(field));
            Err(ValidationError::with_code(field, message, self.rule.name.clone()).into())
        }
    }

    fn rule_name(&self) -> &str {
        &self.rule.name
    }

    fn is_implicit(&self) -> bool {
        self.rule.implicit
    }
}
