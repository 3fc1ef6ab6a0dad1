//! # smart-model: Self-validating models
//!
//! An active-record style layer over a host persistence primitive. A
//! `SmartModel<M>` carries its own validation rules, resolves relations
//! declared in a descriptor table and loads them lazily on attribute access,
//! strips confirmation and CSRF fields before saving, and hashes changed
//! password attributes.
//!
//! Storage, rule evaluation, request input and relation loading are
//! collaborators supplied through a per-type `ModelContext`.

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod event_error;
pub mod events;
pub mod hashing;
pub mod model;
pub mod observers;
pub mod relationships;

#[cfg(test)]
mod testing;

/// Attribute map of one entity
pub type Attributes = smart_validation::Data;

pub use collaborators::{InputSource, NoInput, PersistOptions, Persistence, RuleEngine, ValidationOutcome};
pub use config::{ConfigError, HasherConfig, SmartModelConfig};
pub use context::ModelContext;
pub use error::{InvalidModel, ModelError, ModelResult, RelationError};
pub use event_error::EventError;
pub use events::{ModelEvent, ModelObserver};
pub use hashing::{HashingError, PasswordHasher, PasswordHasherFactory};
pub use model::*;
pub use observers::ObserverRegistry;
pub use relationships::*;

#[cfg(feature = "argon2")]
pub use hashing::Argon2Hasher;
#[cfg(feature = "bcrypt")]
pub use hashing::BcryptHasher;

pub use smart_validation::{CustomMessages, RuleSet, RuleSpec, ValidationError, ValidationErrors, Validator};
