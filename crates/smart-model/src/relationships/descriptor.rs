//! Relation descriptor tables
//!
//! A model type declares its relations once as a `RelationTable`, usually in a
//! `once_cell` static. Tables can also be loaded from YAML or JSON, so the
//! kind is kept as written and only checked when the relation is resolved.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::kind::{fields, RelationKind};

/// One declared relation: kind, target model and kind-specific fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDescriptor {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub morph_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RelationDescriptor {
    /// Descriptor with a raw kind tag and nothing else
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    fn of(kind: RelationKind) -> Self {
        Self::new(kind.as_str())
    }

    pub fn has_one(target: impl Into<String>) -> Self {
        Self::of(RelationKind::HasOne).target(target)
    }

    pub fn has_many(target: impl Into<String>) -> Self {
        Self::of(RelationKind::HasMany).target(target)
    }

    pub fn belongs_to(target: impl Into<String>) -> Self {
        Self::of(RelationKind::BelongsTo).target(target)
    }

    pub fn belongs_to_many(
        target: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
        other_key: impl Into<String>,
    ) -> Self {
        Self::of(RelationKind::BelongsToMany)
            .target(target)
            .table(table)
            .foreign_key(foreign_key)
            .other_key(other_key)
    }

    pub fn morph_to(name: impl Into<String>, morph_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::of(RelationKind::MorphTo)
            .name(name)
            .morph_type(morph_type)
            .id(id)
    }

    pub fn morph_one(target: impl Into<String>, morph_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::of(RelationKind::MorphOne)
            .target(target)
            .morph_type(morph_type)
            .id(id)
    }

    pub fn morph_many(target: impl Into<String>, morph_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::of(RelationKind::MorphMany)
            .target(target)
            .morph_type(morph_type)
            .id(id)
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn other_key(mut self, other_key: impl Into<String>) -> Self {
        self.other_key = Some(other_key.into());
        self
    }

    pub fn pivot_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn morph_type(mut self, morph_type: impl Into<String>) -> Self {
        self.morph_type = Some(morph_type.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether a named descriptor field was supplied
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            fields::FOREIGN_KEY => self.foreign_key.is_some(),
            fields::TABLE => self.table.is_some(),
            fields::OTHER_KEY => self.other_key.is_some(),
            fields::PIVOT_KEYS => self.pivot_keys.is_some(),
            fields::TIMESTAMPS => self.timestamps.is_some(),
            fields::NAME => self.name.is_some(),
            fields::TYPE => self.morph_type.is_some(),
            fields::ID => self.id.is_some(),
            _ => false,
        }
    }
}

static EMPTY_TABLE: Lazy<RelationTable> = Lazy::new(RelationTable::new);

/// Relation name to descriptor, declared once per model type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationTable {
    relations: BTreeMap<String, RelationDescriptor>,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared table for models without relations
    pub fn empty() -> &'static RelationTable {
        &EMPTY_TABLE
    }

    pub fn relation(mut self, name: impl Into<String>, descriptor: RelationDescriptor) -> Self {
        self.relations.insert(name.into(), descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_fill_kind_specific_fields() {
        let roles = RelationDescriptor::belongs_to_many("Role", "role_user", "user_id", "role_id")
            .pivot_keys(["granted_by"])
            .timestamps(true);

        assert_eq!(roles.kind, "belongsToMany");
        assert_eq!(roles.target.as_deref(), Some("Role"));
        assert!(roles.has_field("table"));
        assert!(roles.has_field("otherKey"));
        assert_eq!(roles.pivot_keys, Some(vec!["granted_by".to_string()]));

        let commentable = RelationDescriptor::morph_to("commentable", "commentable_type", "commentable_id");
        assert_eq!(commentable.target, None);
        assert!(commentable.has_field("type"));
    }

    #[test]
    fn test_table_from_yaml() {
        let table = RelationTable::from_yaml_str(
            r#"
items:
  kind: hasMany
  target: Item
  foreignKey: order_id
customer:
  kind: belongsTo
  target: Customer
images:
  kind: morphMany
  target: Image
  name: imageable
  type: imageable_type
  id: imageable_id
"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get("items"),
            Some(&RelationDescriptor::has_many("Item").foreign_key("order_id"))
        );
        assert_eq!(table.get("images").and_then(|d| d.morph_type.as_deref()), Some("imageable_type"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["customer", "images", "items"]);
    }

    #[test]
    fn test_table_json_keeps_unknown_kinds_for_the_resolver() {
        let table = RelationTable::from_json_str(r#"{"tags": {"kind": "hasThrough", "target": "Tag"}}"#).unwrap();
        assert_eq!(table.get("tags").map(|d| d.kind.as_str()), Some("hasThrough"));
    }

    #[test]
    fn test_empty_table_is_shared() {
        assert!(RelationTable::empty().is_empty());
        assert!(std::ptr::eq(RelationTable::empty(), RelationTable::empty()));
    }
}
