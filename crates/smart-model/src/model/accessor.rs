//! Attribute reads with lazy relation fallback
//!
//! A key that is not a plain attribute is looked up in the model's relation
//! table (as written, then in camelCase). Declared relations are resolved,
//! loaded once, and cached under the key that was asked for. The cache is
//! only invalidated explicitly.
//!
//! A key holding an explicit `null` falls through to the relation lookup
//! only when it names a declared or already-loaded relation. Otherwise the
//! `null` is returned as a plain value.

use heck::ToLowerCamelCase;
use serde_json::Value;
use tracing::{debug, trace};

use super::definition::ModelDefinition;
use super::entity::SmartModel;
use crate::error::{ModelResult, RelationError};
use crate::relationships::{RelationHandle, RelationResolver, RelationValue};

/// Result of an attribute read
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Value(Value),
    Relation(RelationValue),
    /// Neither an attribute nor a declared relation
    Missing,
}

impl AttributeValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, AttributeValue::Missing)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            AttributeValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationValue> {
        match self {
            AttributeValue::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// JSON form; `Missing` becomes `null`
    pub fn into_json(self) -> Value {
        match self {
            AttributeValue::Value(value) => value,
            AttributeValue::Relation(relation) => relation.to_json(),
            AttributeValue::Missing => Value::Null,
        }
    }
}

impl<M: ModelDefinition> SmartModel<M> {
    /// Declared relation name for an access key
    pub fn relation_name_for(&self, key: &str) -> Option<String> {
        let table = M::relations();
        if table.contains(key) {
            return Some(key.to_string());
        }
        let camel = key.to_lower_camel_case();
        table.contains(&camel).then_some(camel)
    }

    pub async fn get_attribute(&mut self, key: &str) -> ModelResult<AttributeValue> {
        let relation = self.relation_name_for(key);
        let cached = self.relations.contains_key(key);

        match self.attributes.get(key) {
            Some(Value::Null) if relation.is_some() || cached => {}
            Some(value) => return Ok(AttributeValue::Value(value.clone())),
            None => {}
        }

        if let Some(value) = self.relations.get(key) {
            trace!("Relation cache hit for '{}' on {}", key, M::model_name());
            return Ok(AttributeValue::Relation(value.clone()));
        }

        let Some(relation) = relation else {
            return Ok(AttributeValue::Missing);
        };

        let value = self.load_relation(&relation).await?;
        self.relations.insert(key.to_string(), value.clone());
        Ok(AttributeValue::Relation(value))
    }

    /// Resolve the handle for a declared relation without loading it
    pub fn relation(&self, name: &str) -> Result<RelationHandle, RelationError> {
        RelationResolver::for_model::<M>().resolve(name)
    }

    async fn load_relation(&self, name: &str) -> ModelResult<RelationValue> {
        let handle = self.relation(name)?;
        let loader = self.context.relation_loader()?;
        debug!("Loading relation '{}' for {}", name, M::model_name());
        handle.fetch(loader, &self.attributes).await
    }

    pub fn relation_loaded(&self, key: &str) -> bool {
        self.relations.contains_key(key)
    }

    /// Cache a relation value, e.g. one loaded eagerly elsewhere
    pub fn set_relation(&mut self, key: impl Into<String>, value: RelationValue) {
        self.relations.insert(key.into(), value);
    }

    pub fn unset_relation(&mut self, key: &str) -> Option<RelationValue> {
        self.relations.remove(key)
    }

    /// Re-fetch a declared relation, replacing any cached value. A failed
    /// load leaves the cached value in place.
    pub async fn refresh_relation(&mut self, key: &str) -> ModelResult<RelationValue> {
        let relation = self
            .relation_name_for(key)
            .ok_or_else(|| RelationError::UnknownRelation {
                model: M::model_name().to_string(),
                relation: key.to_string(),
            })?;

        let value = self.load_relation(&relation).await?;
        self.relations.insert(key.to_string(), value.clone());
        Ok(value)
    }
}
