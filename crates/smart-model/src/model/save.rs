//! Save lifecycle: validate, gate, transform, persist
//!
//! Per-call hooks travel inside `SaveOptions` and are dropped when the call
//! returns, so nothing registered for one save can fire for another.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use smart_validation::{CustomMessages, RuleSet};
use tracing::debug;

use super::definition::ModelDefinition;
use super::entity::SmartModel;
use crate::collaborators::PersistOptions;
use crate::error::ModelResult;

/// Runs after `saving` observers; returning false cancels the save
pub type BeforeSaveHook<M> = Box<dyn FnOnce(&mut SmartModel<M>) -> bool + Send>;

/// Runs after `saved` observers, only when the row was written
pub type AfterSaveHook<M> = Box<dyn FnOnce(&SmartModel<M>) + Send>;

/// One-shot callbacks for a single save
pub struct SaveHooks<M: ModelDefinition> {
    before: Option<BeforeSaveHook<M>>,
    after: Option<AfterSaveHook<M>>,
}

impl<M: ModelDefinition> SaveHooks<M> {
    pub fn new() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut SmartModel<M>) -> bool + Send + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&SmartModel<M>) + Send + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

impl<M: ModelDefinition> Default for SaveHooks<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ModelDefinition> fmt::Debug for SaveHooks<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveHooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Arguments of a single save call
#[derive(Debug)]
pub struct SaveOptions<M: ModelDefinition> {
    rules: Option<RuleSet>,
    messages: Option<CustomMessages>,
    persist: PersistOptions,
    hooks: SaveHooks<M>,
    force: bool,
}

impl<M: ModelDefinition> SaveOptions<M> {
    pub fn new() -> Self {
        Self {
            rules: None,
            messages: None,
            persist: PersistOptions::new(),
            hooks: SaveHooks::new(),
            force: false,
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn messages(mut self, messages: CustomMessages) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Option forwarded untouched to the persistence layer
    pub fn persist_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.persist.insert(key.into(), value.into());
        self
    }

    pub fn hooks(mut self, hooks: SaveHooks<M>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut SmartModel<M>) -> bool + Send + 'static,
    {
        self.hooks = self.hooks.before(hook);
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&SmartModel<M>) + Send + 'static,
    {
        self.hooks = self.hooks.after(hook);
        self
    }

    /// Persist even when validation fails
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl<M: ModelDefinition> Default for SaveOptions<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ModelDefinition> SmartModel<M> {
    /// Validate with the type defaults and persist if valid
    pub async fn save(&mut self) -> ModelResult<bool> {
        self.save_with(SaveOptions::new()).await
    }

    /// Persist regardless of the validation outcome
    pub async fn force_save(&mut self) -> ModelResult<bool> {
        self.save_with(SaveOptions::new().force(true)).await
    }

    pub async fn save_with(&mut self, options: SaveOptions<M>) -> ModelResult<bool> {
        let SaveOptions {
            rules,
            messages,
            persist,
            hooks,
            force,
        } = options;

        let valid = self.validate_with(rules, messages).await?;
        if !valid && !force {
            debug!("Not saving {}: validation failed", M::model_name());
            return Ok(false);
        }
        if !valid {
            debug!("Forcing save of {} past failed validation", M::model_name());
        }

        self.perform_save(&persist, hooks).await
    }

    /// Save with `unique` rules rewritten to ignore this entity's row
    pub async fn update_uniques(&mut self, options: SaveOptions<M>) -> ModelResult<bool> {
        let rules = self.build_unique_exclusion_rules(options.rules.as_ref());
        self.save_with(options.rules(rules)).await
    }

    /// Transforms only stick when the row is written. Any veto, cancel,
    /// rejected write or error puts the attributes back as they were, so a
    /// retry neither re-hashes a digest nor loses purged fields.
    async fn perform_save(&mut self, persist: &PersistOptions, hooks: SaveHooks<M>) -> ModelResult<bool> {
        let SaveHooks { before, after } = hooks;
        let unsaved = self.attributes.clone();

        let written = self.transform_and_write(persist, before).await;
        if !matches!(written, Ok(true)) {
            debug!("Restoring unsaved attributes of {}", M::model_name());
            self.attributes = unsaved;
            return written;
        }

        self.sync_original();
        let context = Arc::clone(&self.context);
        context.observers().trigger_saved(self).await?;
        if let Some(after) = after {
            after(self);
        }
        Ok(true)
    }

    async fn transform_and_write(
        &mut self,
        persist: &PersistOptions,
        before: Option<BeforeSaveHook<M>>,
    ) -> ModelResult<bool> {
        if self.config.auto_purge_redundant_attributes {
            self.purge_attributes();
        }
        if self.config.auto_hash_password_attributes {
            self.hash_password_attributes()?;
        }

        let context = Arc::clone(&self.context);
        if let Err(err) = context.observers().trigger_saving(self).await {
            if err.is_veto() {
                debug!("Save of {} vetoed: {}", M::model_name(), err);
                return Ok(false);
            }
            return Err(err.into());
        }

        if let Some(before) = before {
            if !before(self) {
                debug!("Save of {} cancelled by before-save hook", M::model_name());
                return Ok(false);
            }
        }

        debug!("Persisting {} to '{}'", M::model_name(), M::table_name());
        context
            .persistence()
            .save(M::table_name(), &mut self.attributes, persist)
            .await
    }
}
