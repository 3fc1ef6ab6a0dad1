//! Pattern validators: `regex`, `not_regex`, `alpha`, `alpha_num`, `alpha_dash`

use crate::error::{RuleParseError, ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

/// Validates string values against a regular expression
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    /// `not_regex`: fail when the pattern matches
    negate: bool,
}

impl PatternValidator {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            negate: false,
        }
    }

    pub fn negated(pattern: Regex) -> Self {
        Self {
            pattern,
            negate: true,
        }
    }

    /// Compile a rule argument. Delimited forms such as `/^[a-z]+$/i` are
    /// accepted; trailing `i`, `m`, `s` and `x` flags become inline flags.
    pub fn compile(rule: &str, raw: &str) -> Result<Regex, RuleParseError> {
        let source = match (raw.strip_prefix('/'), raw.rfind('/')) {
            (Some(_), Some(end)) if end > 0 => {
                let body = &raw[1..end];
                let flags: String = raw[end + 1..]
                    .chars()
                    .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
                    .collect();
                if flags.is_empty() {
                    body.to_string()
                } else {
                    format!("(?{}){}", flags, body)
                }
            }
            _ => raw.to_string(),
        };

        Regex::new(&source).map_err(|e| RuleParseError::invalid_parameter(rule, raw, e.to_string()))
    }
}

#[async_trait]
impl ValidationRule for PatternValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        let matched = match value {
            Value::String(s) => self.pattern.is_match(s),
            Value::Number(n) => self.pattern.is_match(&n.to_string()),
            _ => false,
        };

        if matched != self.negate {
            Ok(())
        } else {
            let message = format!("The {} format is invalid.", display_name(field));
            Err(ValidationError::with_code(field, message, self.rule_name()).into())
        }
    }

    fn rule_name(&self) -> &str {
        if self.negate {
            "not_regex"
        } else {
            "regex"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    Alpha,
    AlphaNum,
    AlphaDash,
}

/// Restricts strings to a character class (Unicode-aware)
#[derive(Debug, Clone)]
pub struct CharacterClassValidator {
    class: CharacterClass,
}

impl CharacterClassValidator {
    pub fn new(class: CharacterClass) -> Self {
        Self { class }
    }

    fn allows(&self, c: char) -> bool {
        match self.class {
            CharacterClass::Alpha => c.is_alphabetic(),
            CharacterClass::AlphaNum => c.is_alphanumeric(),
            CharacterClass::AlphaDash => c.is_alphanumeric() || c == '-' || c == '_',
        }
    }
}

#[async_trait]
impl ValidationRule for CharacterClassValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if self.class != CharacterClass::Alpha => n.to_string(),
            _ => String::new(),
        };

        if !text.is_empty() && text.chars().all(|c| self.allows(c)) {
            return Ok(());
        }

        let allowed = match self.class {
            CharacterClass::Alpha => "letters",
            CharacterClass::AlphaNum => "letters and numbers",
            CharacterClass::AlphaDash => "letters, numbers, dashes and underscores",
        };
        let message = format!("The {} may only contain {}.", display_name(field), allowed);
        Err(ValidationError::with_code(field, message, self.rule_name()).into())
    }

    fn rule_name(&self) -> &str {
        match self.class {
            CharacterClass::Alpha => "alpha",
            CharacterClass::AlphaNum => "alpha_num",
            CharacterClass::AlphaDash => "alpha_dash",
        }
    }
}
