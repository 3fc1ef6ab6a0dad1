//! Core validation traits

use crate::error::ValidationResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// The attribute map a rule set is evaluated against
pub type Data = HashMap<String, Value>;

/// A single rule, built from a `RuleSpec`
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Check `value` (the current value of `field`) with access to the rest
    /// of the data for cross-field rules
    async fn validate(&self, field: &str, value: &Value, data: &Data) -> ValidationResult<()>;

    /// The rule name as written in rule strings
    fn rule_name(&self) -> &str;

    /// Implicit rules also run when the field is absent or empty
    fn is_implicit(&self) -> bool {
        false
    }

    /// Placeholder replacements for custom messages (`:min` -> `3`)
    fn replacements(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Human form of a field name used in default messages
pub fn display_name(field: &str) -> String {
    field.replace('_', " ")
}

/// True for values non-implicit rules skip: absent, null, or blank strings
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// String form used when comparing values across fields or against lists
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("first_name"), "first name");
    }

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("  ")));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!([])));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("abc")), "abc");
        assert_eq!(value_to_string(&json!(7)), "7");
        assert_eq!(value_to_string(&json!(true)), "true");
    }
}
