//! `unique:table,column,except,id_column`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{RuleParseError, ValidationError, ValidationResult};
use crate::presence::{Exclusion, PresenceVerifier};
use crate::rule_set::RuleSpec;
use crate::traits::{display_name, Data, ValidationRule};

/// Identifier column assumed when the rule does not name one
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Except value meaning "exclude nothing"
pub const NO_EXCLUSION: &str = "NULL";

pub struct UniqueValidator {
    pub table: String,
    pub column: String,
    pub except: Option<String>,
    pub id_column: String,
    verifier: Option<Arc<dyn PresenceVerifier>>,
}

impl UniqueValidator {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            except: None,
            id_column: DEFAULT_ID_COLUMN.to_string(),
            verifier: None,
        }
    }

    /// Build from rule parameters; `field` is the column fallback
    pub fn from_spec(field: &str, spec: &RuleSpec) -> Result<Self, RuleParseError> {
        let table = spec
            .param(0)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RuleParseError::parameter_count("unique", "at least 1", spec.params.len()))?;

        let column = spec.param(1).filter(|c| !c.is_empty()).unwrap_or(field);
        let except = spec
            .param(2)
            .filter(|e| !e.is_empty() && *e != NO_EXCLUSION)
            .map(str::to_string);
        let id_column = spec
            .param(3)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ID_COLUMN);

        Ok(Self {
            table: table.to_string(),
            column: column.to_string(),
            except,
            id_column: id_column.to_string(),
            verifier: None,
        })
    }

    pub fn except(mut self, id: impl Into<String>, id_column: impl Into<String>) -> Self {
        self.except = Some(id.into());
        self.id_column = id_column.into();
        self
    }

    pub fn verifier(mut self, verifier: Option<Arc<dyn PresenceVerifier>>) -> Self {
        self.verifier = verifier;
        self
    }
}

impl std::fmt::Debug for UniqueValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueValidator")
            .field("table", &self.table)
            .field("column", &self.column)
            .field("except", &self.except)
            .field("id_column", &self.id_column)
            .field("has_verifier", &self.verifier.is_some())
            .finish()
    }
}

#[async_trait]
impl ValidationRule for UniqueValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        let Some(verifier) = self.verifier.as_ref() else {
            return Err(ValidationError::with_code(
                field,
                format!("No presence verifier is configured to check {}.{}", self.table, self.column),
                "missing_verifier",
            )
            .into());
        };

        let exclusion = self.except.as_deref().map(|id| Exclusion {
            id_column: &self.id_column,
            id,
        });

        match verifier.count(&self.table, &self.column, value, exclusion).await {
            Ok(0) => Ok(()),
            Ok(_) => {
                let message = format!("The {} has already been taken.", display_name(field));
                Err(ValidationError::with_code(field, message, "unique").into())
            }
            Err(err) => {
                tracing::warn!("Uniqueness lookup failed for field '{}': {}", field, err);
                Err(ValidationError::with_code(field, err.to_string(), "presence_error").into())
            }
        }
    }

    fn rule_name(&self) -> &str {
        "unique"
    }
}
