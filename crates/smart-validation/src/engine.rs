//! Rule-set evaluation
//!
//! `Validator` turns each `RuleSpec` into a `ValidationRule`, runs it against
//! the data, and rewrites messages from the caller's overrides.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RuleParseError, ValidationError, ValidationErrors, ValidationResult};
use crate::presence::PresenceVerifier;
use crate::rule_set::{RuleSet, RuleSpec};
use crate::traits::{display_name, is_blank, Data, ValidationRule};
use crate::validators::*;

/// Message overrides keyed `field.rule` or `rule`
pub type CustomMessages = HashMap<String, String>;

/// Evaluates rule sets. Cheap to clone; share one per application.
#[derive(Clone, Default)]
pub struct Validator {
    presence: Option<Arc<dyn PresenceVerifier>>,
    extensions: HashMap<String, CustomRule>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("has_presence_verifier", &self.presence.is_some())
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage lookup used by `unique`
    pub fn with_presence_verifier(mut self, verifier: Arc<dyn PresenceVerifier>) -> Self {
        self.presence = Some(verifier);
        self
    }

    /// Register an application rule. Built-in names cannot be shadowed.
    pub fn extend(mut self, rule: CustomRule) -> Self {
        self.extensions.insert(rule.name().to_string(), rule);
        self
    }

    /// Evaluate `rules` against `data`. `Ok(())` means every rule passed.
    pub async fn evaluate(
        &self,
        data: &Data,
        rules: &RuleSet,
        messages: &CustomMessages,
    ) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        for (field, specs) in rules.iter() {
            let value = data.get(field).cloned().unwrap_or(Value::Null);
            let numeric = specs.iter().any(|s| s.is("numeric") || s.is("integer"));

            for spec in specs {
                let rule = match self.build_rule(field, spec, numeric) {
                    Ok(rule) => rule,
                    Err(err) => {
                        warn!("Invalid rule '{}' on field '{}': {}", spec, field, err);
                        let code = match err {
                            RuleParseError::UnknownRule(_) => "unknown_rule",
                            _ => "invalid_rule",
                        };
                        errors.add(ValidationError::with_code(field.as_str(), err.to_string(), code));
                        continue;
                    }
                };

                if !rule.is_implicit() && is_blank(&value) {
                    continue;
                }

                if let Err(rule_errors) = rule.validate(field, &value, data).await {
                    for error in rule_errors.errors.into_values().flatten() {
                        errors.add(apply_override(error, rule.as_ref(), messages));
                    }
                }
            }
        }

        if errors.is_empty() {
            debug!("Validation passed for {} field(s)", rules.len());
            Ok(())
        } else {
            debug!("Validation failed with {} error(s)", errors.total_errors());
            Err(errors)
        }
    }

    /// Construct the rule a spec names
    pub fn build_rule(
        &self,
        field: &str,
        spec: &RuleSpec,
        numeric: bool,
    ) -> Result<Box<dyn ValidationRule>, RuleParseError> {
        let rule: Box<dyn ValidationRule> = match spec.name.as_str() {
            "required" => Box::new(RequiredValidator::new()),
            "accepted" => Box::new(AcceptedValidator::new()),
            "email" => Box::new(EmailValidator::new()),
            "min" => Box::new(SizeValidator::min(number_param(spec, 0, 1)?).numeric(numeric)),
            "max" => Box::new(SizeValidator::max(number_param(spec, 0, 1)?).numeric(numeric)),
            "size" => Box::new(SizeValidator::exact(number_param(spec, 0, 1)?).numeric(numeric)),
            "between" => {
                let min = number_param(spec, 0, 2)?;
                let max = number_param(spec, 1, 2)?;
                Box::new(SizeValidator::between(min, max).numeric(numeric))
            }
            "numeric" => Box::new(NumericValidator::new()),
            "integer" => Box::new(NumericValidator::integer()),
            "string" => Box::new(FormatValidator::new(Format::String)),
            "boolean" => Box::new(FormatValidator::new(Format::Boolean)),
            "date" => Box::new(FormatValidator::new(Format::Date)),
            "url" => Box::new(FormatValidator::new(Format::Url)),
            "uuid" => Box::new(FormatValidator::new(Format::Uuid)),
            "alpha" => Box::new(CharacterClassValidator::new(CharacterClass::Alpha)),
            "alpha_num" => Box::new(CharacterClassValidator::new(CharacterClass::AlphaNum)),
            "alpha_dash" => Box::new(CharacterClassValidator::new(CharacterClass::AlphaDash)),
            "regex" => Box::new(PatternValidator::new(PatternValidator::compile(
                "regex",
                text_param(spec, 0, "1")?,
            )?)),
            "not_regex" => Box::new(PatternValidator::negated(PatternValidator::compile(
                "not_regex",
                text_param(spec, 0, "1")?,
            )?)),
            "in" => Box::new(MembershipValidator::one_of(spec.params.iter().cloned())),
            "not_in" => Box::new(MembershipValidator::none_of(spec.params.iter().cloned())),
            "confirmed" => Box::new(FieldComparisonValidator::confirmed(field)),
            "same" => Box::new(FieldComparisonValidator::same(text_param(spec, 0, "1")?)),
            "different" => Box::new(FieldComparisonValidator::different(text_param(spec, 0, "1")?)),
            "unique" => Box::new(UniqueValidator::from_spec(field, spec)?.verifier(self.presence.clone())),
            other => match self.extensions.get(other) {
                Some(custom) => Box::new(custom.bind(&spec.params)),
                None => return Err(RuleParseError::UnknownRule(other.to_string())),
            },
        };
        Ok(rule)
    }
}

fn text_param<'a>(spec: &'a RuleSpec, index: usize, expected: &str) -> Result<&'a str, RuleParseError> {
    spec.param(index)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RuleParseError::parameter_count(&spec.name, expected, spec.params.len()))
}

fn number_param(spec: &RuleSpec, index: usize, expected: usize) -> Result<f64, RuleParseError> {
    let raw = text_param(spec, index, &expected.to_string())?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| RuleParseError::invalid_parameter(&spec.name, raw, "expected a number"))
}

/// Swap in a `field.rule` or `rule` override, filling placeholders
fn apply_override(
    error: ValidationError,
    rule: &dyn ValidationRule,
    messages: &CustomMessages,
) -> ValidationError {
    let specific = format!("{}.{}", error.field, error.code);
    let template = messages
        .get(&specific)
        .or_else(|| messages.get(error.code.as_str()));

    match template {
        Some(template) => {
            let mut message = template.replace(":attribute", &display_name(&error.field));
            for (placeholder, replacement) in rule.replacements() {
                message = message.replace(placeholder, &replacement);
            }
            error.message(message)
        }
        None => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::InMemoryPresenceVerifier;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> Data {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[tokio::test]
    async fn test_passing_rule_set() {
        let rules = RuleSet::new()
            .with("name", "required|alpha|min:2")
            .with("email", "required|email");
        let input = data(&[("name", json!("Ada")), ("email", json!("ada@example.com"))]);

        let result = Validator::new().evaluate(&input, &rules, &CustomMessages::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_collects_errors_per_field_in_rule_order() {
        let rules = RuleSet::new().with("password", "min:8|alpha_num|confirmed");
        let input = data(&[("password", json!("ab!"))]);

        let errors = Validator::new()
            .evaluate(&input, &rules, &CustomMessages::new())
            .await
            .unwrap_err();

        let messages = errors.messages();
        assert_eq!(
            messages["password"],
            vec![
                "The password must be at least 8 characters.",
                "The password may only contain letters and numbers.",
                "The password confirmation does not match.",
            ]
        );
    }

    #[tokio::test]
    async fn test_optional_fields_skip_non_implicit_rules() {
        let rules = RuleSet::new().with("website", "url|max:100");
        let result = Validator::new()
            .evaluate(&Data::new(), &rules, &CustomMessages::new())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_numeric_fields_measure_by_value() {
        let rules = RuleSet::new().with("age", "numeric|min:18");
        let input = data(&[("age", json!("9"))]);

        let errors = Validator::new()
            .evaluate(&input, &rules, &CustomMessages::new())
            .await
            .unwrap_err();
        assert_eq!(errors.first("age"), Some("The age must be at least 18."));
    }

    #[tokio::test]
    async fn test_custom_messages_prefer_field_specific_key() {
        let rules = RuleSet::new()
            .with("name", "required")
            .with("title", "required|between:3,5");
        let mut messages = CustomMessages::new();
        messages.insert("required".to_string(), "Please fill in :attribute.".to_string());
        messages.insert("name.required".to_string(), "We need your name.".to_string());
        messages.insert("between".to_string(), ":attribute needs :min to :max chars.".to_string());

        let input = data(&[("title", json!("ab"))]);
        let errors = Validator::new().evaluate(&input, &rules, &messages).await.unwrap_err();

        assert_eq!(errors.first("name"), Some("We need your name."));
        assert_eq!(errors.first("title"), Some("title needs 3 to 5 chars."));
    }

    #[tokio::test]
    async fn test_unknown_rule_is_reported_not_ignored() {
        let rules = RuleSet::new().with("name", "sparkly");
        let input = data(&[("name", json!("x"))]);

        let errors = Validator::new()
            .evaluate(&input, &rules, &CustomMessages::new())
            .await
            .unwrap_err();
        assert_eq!(errors.get_field_errors("name").unwrap()[0].code, "unknown_rule");
    }

    #[tokio::test]
    async fn test_malformed_parameters_are_reported() {
        let rules = RuleSet::new().with("name", "between:3");
        let input = data(&[("name", json!("abcd"))]);

        let errors = Validator::new()
            .evaluate(&input, &rules, &CustomMessages::new())
            .await
            .unwrap_err();
        assert_eq!(errors.get_field_errors("name").unwrap()[0].code, "invalid_rule");
    }

    #[tokio::test]
    async fn test_unique_uses_presence_verifier() {
        let verifier = InMemoryPresenceVerifier::new()
            .with_row("users", data(&[("id", json!(7)), ("email", json!("ada@example.com"))]));
        let validator = Validator::new().with_presence_verifier(Arc::new(verifier));
        let input = data(&[("email", json!("ada@example.com"))]);

        let conflicting = RuleSet::new().with("email", "unique:users");
        assert!(validator.evaluate(&input, &conflicting, &CustomMessages::new()).await.is_err());

        let excluding_self = RuleSet::new().with("email", "unique:users,email,7,id");
        assert!(validator.evaluate(&input, &excluding_self, &CustomMessages::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_extension_rules() {
        let validator = Validator::new().extend(CustomRule::new(
            "even",
            "The :attribute must be even.",
            |_, value, _, _| value.as_i64().map(|v| v % 2 == 0).unwrap_or(false),
        ));
        let rules = RuleSet::new().with("seats", "integer|even");

        let odd = data(&[("seats", json!(3))]);
        let errors = validator.evaluate(&odd, &rules, &CustomMessages::new()).await.unwrap_err();
        assert_eq!(errors.first("seats"), Some("The seats must be even."));

        let even = data(&[("seats", json!(4))]);
        assert!(validator.evaluate(&even, &rules, &CustomMessages::new()).await.is_ok());
    }
}
