//! Error types for SmartModel operations
//!
//! Relation errors are programmer errors surfaced at access time. Validation
//! failures only become errors in hard-fail mode. Persistence and hashing
//! errors pass through as the collaborator reported them.

use std::fmt;

use serde_json::Value;
use smart_validation::ValidationErrors;
use thiserror::Error;

use crate::config::ConfigError;
use crate::event_error::EventError;
use crate::hashing::HashingError;
use crate::relationships::RelationKind;
use crate::Attributes;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Invalid relation descriptors, detected when the relation is accessed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    #[error("Relation '{relation}' is not declared on {model}")]
    UnknownRelation { model: String, relation: String },

    #[error("Relation '{relation}' on {model} has unrecognized kind '{kind}'")]
    InvalidRelationKind {
        model: String,
        relation: String,
        kind: String,
    },

    #[error("Relation '{relation}' on {model} ({kind}) requires a target model")]
    MissingTargetType {
        model: String,
        relation: String,
        kind: RelationKind,
    },

    #[error("Relation '{relation}' on {model} ({kind}) does not accept '{argument}'")]
    UnexpectedArgument {
        model: String,
        relation: String,
        kind: RelationKind,
        argument: String,
    },

    #[error(
        "Relation '{relation}' on {model} ({kind}) is missing required field(s): {}",
        .fields.join(", ")
    )]
    MissingRequiredField {
        model: String,
        relation: String,
        kind: RelationKind,
        fields: Vec<String>,
    },
}

/// Snapshot of an entity that failed validation in hard-fail mode
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidModel {
    pub model: &'static str,
    pub primary_key: Option<Value>,
    pub attributes: Attributes,
    pub errors: ValidationErrors,
}

/// Error types for SmartModel operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Relation descriptor is unknown or malformed
    Relation(RelationError),
    /// A validating listener vetoed in hard-fail mode
    ValidationVetoed { model: &'static str, reason: String },
    /// Rules failed in hard-fail mode
    ValidationFailed(Box<InvalidModel>),
    /// Reported by the persistence collaborator
    Persistence(String),
    /// Password hashing failed
    Hashing(String),
    /// Lifecycle observer failed
    Event(EventError),
    /// Missing collaborator or invalid settings
    Configuration(String),
}

impl ModelError {
    /// Validation messages carried by a hard failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ModelError::ValidationFailed(invalid) => Some(&invalid.errors),
            _ => None,
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Relation(err) => write!(f, "Relation error: {}", err),
            ModelError::ValidationVetoed { model, reason } => {
                write!(f, "Validation of {} was vetoed: {}", model, reason)
            }
            ModelError::ValidationFailed(invalid) => write!(
                f,
                "{} failed validation with {} error(s)",
                invalid.model,
                invalid.errors.total_errors()
            ),
            ModelError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            ModelError::Hashing(msg) => write!(f, "Hashing error: {}", msg),
            ModelError::Event(err) => write!(f, "Event error: {}", err),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<RelationError> for ModelError {
    fn from(err: RelationError) -> Self {
        ModelError::Relation(err)
    }
}

impl From<EventError> for ModelError {
    fn from(err: EventError) -> Self {
        ModelError::Event(err)
    }
}

impl From<HashingError> for ModelError {
    fn from(err: HashingError) -> Self {
        ModelError::Hashing(err.to_string())
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_field_lists_every_field() {
        let err = RelationError::MissingRequiredField {
            model: "User".to_string(),
            relation: "roles".to_string(),
            kind: RelationKind::BelongsToMany,
            fields: vec!["table".to_string(), "otherKey".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Relation 'roles' on User (belongsToMany) is missing required field(s): table, otherKey"
        );
    }

    #[test]
    fn test_validation_failed_exposes_errors() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", "The email field is required.");

        let err = ModelError::ValidationFailed(Box::new(InvalidModel {
            model: "User",
            primary_key: None,
            attributes: Attributes::new(),
            errors,
        }));

        assert_eq!(err.to_string(), "User failed validation with 1 error(s)");
        assert_eq!(
            err.validation_errors().and_then(|e| e.first("email")),
            Some("The email field is required.")
        );
        assert!(ModelError::Persistence("down".into()).validation_errors().is_none());
    }

    #[test]
    fn test_conversions() {
        let err: ModelError = EventError::observer("boom").into();
        assert!(matches!(err, ModelError::Event(_)));

        let err: ModelError = RelationError::UnknownRelation {
            model: "Order".to_string(),
            relation: "ghost".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Relation error: Relation 'ghost' is not declared on Order");
    }
}
