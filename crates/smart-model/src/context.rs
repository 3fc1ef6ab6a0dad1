//! Per-model-type collaborators
//!
//! A `ModelContext<M>` is built once per model type, shared behind an `Arc`,
//! and handed to every entity of that type.

use std::sync::Arc;

use smart_validation::Validator;

use crate::collaborators::{InputSource, NoInput, Persistence, RuleEngine};
use crate::config::HasherConfig;
use crate::error::{ModelError, ModelResult};
use crate::events::ModelObserver;
use crate::hashing::{PasswordHasher, PasswordHasherFactory};
use crate::model::{ModelDefinition, SmartModel};
use crate::observers::ObserverRegistry;
use crate::relationships::RelationLoader;

pub struct ModelContext<M: ModelDefinition> {
    persistence: Arc<dyn Persistence>,
    rule_engine: Arc<dyn RuleEngine>,
    relation_loader: Option<Arc<dyn RelationLoader>>,
    input: Arc<dyn InputSource>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    observers: ObserverRegistry<SmartModel<M>>,
}

impl<M: ModelDefinition> ModelContext<M> {
    /// Context with the default rule engine, no input and no relation
    /// loader
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            rule_engine: Arc::new(Validator::new()),
            relation_loader: None,
            input: Arc::new(NoInput),
            hasher: None,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn with_rule_engine(mut self, engine: Arc<dyn RuleEngine>) -> Self {
        self.rule_engine = engine;
        self
    }

    pub fn with_relation_loader(mut self, loader: Arc<dyn RelationLoader>) -> Self {
        self.relation_loader = Some(loader);
        self
    }

    pub fn with_input(mut self, input: Arc<dyn InputSource>) -> Self {
        self.input = input;
        self
    }

    /// Use this hasher instead of one built from the entity's config
    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ModelObserver<SmartModel<M>>>) -> Self {
        self.observers.register(observer);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn persistence(&self) -> &dyn Persistence {
        self.persistence.as_ref()
    }

    pub fn rule_engine(&self) -> &dyn RuleEngine {
        self.rule_engine.as_ref()
    }

    pub fn input(&self) -> &dyn InputSource {
        self.input.as_ref()
    }

    pub fn observers(&self) -> &ObserverRegistry<SmartModel<M>> {
        &self.observers
    }

    pub fn relation_loader(&self) -> ModelResult<&dyn RelationLoader> {
        self.relation_loader.as_deref().ok_or_else(|| {
            ModelError::Configuration(format!("No relation loader configured for {}", M::model_name()))
        })
    }

    /// The configured hasher, else one built from `config`
    pub fn hasher_for(&self, config: &HasherConfig) -> ModelResult<Arc<dyn PasswordHasher>> {
        match &self.hasher {
            Some(hasher) => Ok(Arc::clone(hasher)),
            None => Ok(Arc::from(PasswordHasherFactory::from_config(config)?)),
        }
    }
}

impl<M: ModelDefinition> std::fmt::Debug for ModelContext<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("model", &M::model_name())
            .field("has_relation_loader", &self.relation_loader.is_some())
            .field("has_hasher", &self.hasher.is_some())
            .field("observers", &self.observers.observer_count())
            .finish()
    }
}
