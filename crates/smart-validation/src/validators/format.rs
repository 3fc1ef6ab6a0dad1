//! Type and format validators: `string`, `boolean`, `date`, `url`, `uuid`

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    String,
    Boolean,
    Date,
    Url,
    Uuid,
}

/// Checks that a value has a given type or textual format
#[derive(Debug, Clone)]
pub struct FormatValidator {
    format: Format,
}

impl FormatValidator {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.format {
            Format::String => value.is_string(),
            Format::Boolean => match value {
                Value::Bool(_) => true,
                Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
                Value::String(s) => matches!(s.as_str(), "0" | "1"),
                _ => false,
            },
            Format::Date => value.as_str().map(is_date).unwrap_or(false),
            Format::Url => value
                .as_str()
                .map(|s| url::Url::parse(s).map(|u| u.has_host()).unwrap_or(false))
                .unwrap_or(false),
            Format::Uuid => value
                .as_str()
                .map(|s| uuid::Uuid::parse_str(s).is_ok())
                .unwrap_or(false),
        }
    }

    fn message(&self, field: &str) -> String {
        let field = display_name(field);
        match self.format {
            Format::String => format!("The {} must be a string.", field),
            Format::Boolean => format!("The {} field must be true or false.", field),
            Format::Date => format!("The {} is not a valid date.", field),
            Format::Url => format!("The {} format is invalid.", field),
            Format::Uuid => format!("The {} must be a valid UUID.", field),
        }
    }
}

fn is_date(candidate: &str) -> bool {
    DateTime::parse_from_rfc3339(candidate).is_ok()
        || NaiveDate::parse_from_str(candidate, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(candidate, "%Y-%m-%d %H:%M:%S").is_ok()
}

#[async_trait]
impl ValidationRule for FormatValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::with_code(field, self.message(field), self.rule_name()).into())
        }
    }

    fn rule_name(&self) -> &str {
        match self.format {
            Format::String => "string",
            Format::Boolean => "boolean",
            Format::Date => "date",
            Format::Url => "url",
            Format::Uuid => "uuid",
        }
    }
}
