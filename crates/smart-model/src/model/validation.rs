//! Self-validation against the model's rules

use std::sync::Arc;

use smart_validation::{CustomMessages, RuleSet, ValidationErrors};
use tracing::{debug, warn};

use super::definition::ModelDefinition;
use super::entity::SmartModel;
use crate::error::{ModelError, ModelResult};

impl<M: ModelDefinition> SmartModel<M> {
    /// Validate against the type's default rules and messages
    pub async fn validate(&mut self) -> ModelResult<bool> {
        self.validate_with(None, None).await
    }

    /// Validate against explicit rules and messages, falling back to the
    /// type defaults for whichever is `None`.
    ///
    /// Returns `Ok(false)` on failure or veto unless hard-fail mode is on,
    /// in which case those become `ValidationFailed` and
    /// `ValidationVetoed` errors.
    pub async fn validate_with(
        &mut self,
        rules: Option<RuleSet>,
        messages: Option<CustomMessages>,
    ) -> ModelResult<bool> {
        let context = Arc::clone(&self.context);
        let hard_fail = self.config.throw_on_validation;

        if let Err(err) = context.observers().trigger_validating(self).await {
            if !err.is_veto() {
                return Err(err.into());
            }
            debug!("Validation of {} vetoed: {}", M::model_name(), err);
            if hard_fail {
                return Err(ModelError::ValidationVetoed {
                    model: M::model_name(),
                    reason: err.to_string(),
                });
            }
            return Ok(false);
        }

        let rules = rules.unwrap_or_else(M::rules).without_empty();

        let passed = if rules.is_empty() {
            self.errors = ValidationErrors::new();
            true
        } else {
            let messages = messages.unwrap_or_else(M::messages);
            self.hydrate_from_input();

            let outcome = context
                .rule_engine()
                .evaluate(&self.attributes, &rules, &messages)
                .await;

            if outcome.passed {
                self.errors = ValidationErrors::new();
            } else {
                warn!(
                    "{} failed validation with {} error(s)",
                    M::model_name(),
                    outcome.errors.total_errors()
                );
                self.errors = outcome.errors;
                if !self.config.external_validator && context.input().has_session() {
                    context.input().flash();
                }
            }
            outcome.passed
        };

        context.observers().trigger_validated(self, passed).await?;

        if !passed && hard_fail {
            return Err(ModelError::ValidationFailed(Box::new(self.invalid_snapshot())));
        }
        Ok(passed)
    }

    /// Validate with `unique` rules rewritten to ignore this entity's row
    pub async fn validate_uniques(
        &mut self,
        rules: Option<RuleSet>,
        messages: Option<CustomMessages>,
    ) -> ModelResult<bool> {
        let rules = self.build_unique_exclusion_rules(rules.as_ref());
        self.validate_with(Some(rules), messages).await
    }

    /// Messages from the last validation
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// True when the last validation left no messages
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn hydrate_from_input(&mut self) {
        let hydrate = self.config.force_entity_hydration_from_input
            || (self.config.auto_hydrate_entity_from_input && self.attributes.is_empty());
        if hydrate {
            let input = self.context.input().all();
            debug!("Hydrating {} with {} input value(s)", M::model_name(), input.len());
            self.fill(input);
        }
    }
}
