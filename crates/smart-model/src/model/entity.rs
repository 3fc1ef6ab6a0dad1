//! The SmartModel entity: attributes, persisted original and cached state

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use smart_validation::ValidationErrors;

use super::definition::{ModelDefinition, DEFAULT_PRIMARY_KEY};
use super::purge::{default_purge_filters, PurgeFilter};
use crate::config::SmartModelConfig;
use crate::context::ModelContext;
use crate::error::InvalidModel;
use crate::relationships::RelationValue;
use crate::Attributes;

/// One row of `M`, as held in memory
pub struct SmartModel<M: ModelDefinition> {
    pub(crate) attributes: Attributes,
    /// Values as last persisted
    pub(crate) original: Attributes,
    pub(crate) relations: HashMap<String, RelationValue>,
    pub(crate) errors: ValidationErrors,
    pub(crate) config: SmartModelConfig,
    pub(crate) purge_filters: Vec<PurgeFilter>,
    pub(crate) context: Arc<ModelContext<M>>,
}

impl<M: ModelDefinition> SmartModel<M> {
    /// Empty, unsaved entity using the type's configuration
    pub fn new(context: Arc<ModelContext<M>>) -> Self {
        Self {
            attributes: Attributes::new(),
            original: Attributes::new(),
            relations: HashMap::new(),
            errors: ValidationErrors::new(),
            config: M::config(),
            purge_filters: default_purge_filters(),
            context,
        }
    }

    /// Unsaved entity with initial attributes
    pub fn with_attributes<I, K>(context: Arc<ModelContext<M>>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut model = Self::new(context);
        model.fill(attributes);
        model
    }

    /// Entity for a row already in storage; every attribute starts clean
    pub fn from_persisted(context: Arc<ModelContext<M>>, attributes: Attributes) -> Self {
        let mut model = Self::new(context);
        model.attributes = attributes;
        model.sync_original();
        model
    }

    /// Override the type-level configuration for this entity
    pub fn with_config(mut self, config: SmartModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SmartModelConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SmartModelConfig {
        &mut self.config
    }

    pub fn context(&self) -> &Arc<ModelContext<M>> {
        &self.context
    }

    pub fn model_name(&self) -> &'static str {
        M::model_name()
    }

    pub fn table(&self) -> &'static str {
        M::table_name()
    }

    /// Merge attributes, overwriting existing keys
    pub fn fill<I, K>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in attributes {
            self.attributes.insert(key.into(), value);
        }
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Plain attribute lookup, without relation fallback
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn original(&self) -> &Attributes {
        &self.original
    }

    /// Mark the current attributes as persisted
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    /// True when `key` differs from its persisted value
    pub fn is_dirty(&self, key: &str) -> bool {
        self.attributes.get(key) != self.original.get(key)
    }

    /// Changed attribute names, sorted
    pub fn dirty(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .attributes
            .keys()
            .chain(self.original.keys())
            .map(String::as_str)
            .filter(|key| self.is_dirty(key))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Declared identifier column, else `id`
    pub fn primary_key_column(&self) -> &'static str {
        M::primary_key_name().unwrap_or(DEFAULT_PRIMARY_KEY)
    }

    /// Current identifier value, ignoring null
    pub fn primary_key(&self) -> Option<&Value> {
        self.attributes
            .get(self.primary_key_column())
            .filter(|value| !value.is_null())
    }

    /// Whether the entity has an identifier, i.e. a stored row
    pub fn exists(&self) -> bool {
        self.primary_key().is_some()
    }

    pub(crate) fn invalid_snapshot(&self) -> InvalidModel {
        InvalidModel {
            model: M::model_name(),
            primary_key: self.primary_key().cloned(),
            attributes: self.attributes.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl<M: ModelDefinition> fmt::Debug for SmartModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartModel")
            .field("model", &M::model_name())
            .field("attributes", &self.attributes)
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .field("errors", &self.errors.total_errors())
            .finish()
    }
}
