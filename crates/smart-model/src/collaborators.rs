//! Seams to the systems SmartModel orchestrates but does not own

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use smart_validation::{CustomMessages, RuleSet, ValidationErrors, Validator};

use crate::error::ModelResult;
use crate::Attributes;

/// Opaque options forwarded to the persistence layer
pub type PersistOptions = HashMap<String, Value>;

/// Base persistence primitive
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Write `attributes` to `table`. Implementations may assign generated
    /// keys in place.
    async fn save(&self, table: &str, attributes: &mut Attributes, options: &PersistOptions) -> ModelResult<bool>;
}

/// What the rule engine reports back
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub errors: ValidationErrors,
}

impl ValidationOutcome {
    pub fn passed() -> Self {
        Self {
            passed: true,
            errors: ValidationErrors::new(),
        }
    }

    pub fn failed(errors: ValidationErrors) -> Self {
        Self { passed: false, errors }
    }
}

/// Rule-evaluation engine
#[async_trait]
pub trait RuleEngine: Send + Sync {
    async fn evaluate(&self, data: &Attributes, rules: &RuleSet, messages: &CustomMessages) -> ValidationOutcome;
}

#[async_trait]
impl RuleEngine for Validator {
    async fn evaluate(&self, data: &Attributes, rules: &RuleSet, messages: &CustomMessages) -> ValidationOutcome {
        match Validator::evaluate(self, data, rules, messages).await {
            Ok(()) => ValidationOutcome::passed(),
            Err(errors) => ValidationOutcome::failed(errors),
        }
    }
}

/// Ambient request input
pub trait InputSource: Send + Sync {
    fn all(&self) -> Attributes;

    fn has_session(&self) -> bool;

    /// Keep the current input for redisplay on the next request
    fn flash(&self);
}

/// Input source for code running outside a request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn all(&self) -> Attributes {
        Attributes::new()
    }

    fn has_session(&self) -> bool {
        false
    }

    fn flash(&self) {}
}
