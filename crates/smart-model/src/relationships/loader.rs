//! Relation loading seam, implemented by the base ORM

use async_trait::async_trait;
use serde_json::Value;

use super::handle::RelationHandle;
use crate::error::ModelResult;
use crate::Attributes;

/// Executes the query a relation handle describes
#[async_trait]
pub trait RelationLoader: Send + Sync {
    /// Single-row kinds: has-one, belongs-to, morph-one, morph-to
    async fn load_one(&self, relation: &RelationHandle, parent: &Attributes) -> ModelResult<Option<Attributes>>;

    /// Collection kinds: has-many, belongs-to-many, morph-many
    async fn load_many(&self, relation: &RelationHandle, parent: &Attributes) -> ModelResult<Vec<Attributes>>;
}

/// Loaded relation result, cached on the entity by access key
#[derive(Debug, Clone, PartialEq)]
pub enum RelationValue {
    One(Option<Attributes>),
    Many(Vec<Attributes>),
}

impl RelationValue {
    pub fn is_collection(&self) -> bool {
        matches!(self, RelationValue::Many(_))
    }

    pub fn as_one(&self) -> Option<&Attributes> {
        match self {
            RelationValue::One(row) => row.as_ref(),
            RelationValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Attributes]> {
        match self {
            RelationValue::Many(rows) => Some(rows),
            RelationValue::One(_) => None,
        }
    }

    /// Number of related rows
    pub fn len(&self) -> usize {
        match self {
            RelationValue::One(row) => usize::from(row.is_some()),
            RelationValue::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON form: an object, `null`, or an array of objects
    pub fn to_json(&self) -> Value {
        fn object(row: &Attributes) -> Value {
            Value::Object(row.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        }
        match self {
            RelationValue::One(Some(row)) => object(row),
            RelationValue::One(None) => Value::Null,
            RelationValue::Many(rows) => Value::Array(rows.iter().map(object).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: i64) -> Attributes {
        let mut row = Attributes::new();
        row.insert("id".to_string(), json!(id));
        row
    }

    #[test]
    fn test_relation_value_accessors() {
        let many = RelationValue::Many(vec![row(1), row(2)]);
        assert!(many.is_collection());
        assert_eq!(many.len(), 2);
        assert!(many.as_one().is_none());
        assert_eq!(many.to_json(), json!([{"id": 1}, {"id": 2}]));

        let missing = RelationValue::One(None);
        assert!(missing.is_empty());
        assert_eq!(missing.to_json(), Value::Null);

        let one = RelationValue::One(Some(row(3)));
        assert_eq!(one.as_one().and_then(|r| r.get("id")), Some(&json!(3)));
    }
}
