//! Resolved relations
//!
//! A `RelationHandle` is what the seven relation constructors produce. It
//! carries every key the loader needs and knows its own cardinality, but it
//! never queries anything itself.

use heck::ToSnakeCase;

use super::kind::RelationKind;
use super::loader::{RelationLoader, RelationValue};
use crate::error::ModelResult;
use crate::Attributes;

/// Kind-specific keys of a resolved relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    HasOne {
        target: String,
        foreign_key: String,
    },
    HasMany {
        target: String,
        foreign_key: String,
    },
    BelongsTo {
        target: String,
        foreign_key: String,
    },
    BelongsToMany {
        target: String,
        table: String,
        foreign_key: String,
        other_key: String,
        pivot_columns: Vec<String>,
        timestamps: bool,
    },
    MorphTo {
        name: String,
        morph_type: String,
        id: String,
    },
    MorphOne {
        target: String,
        name: String,
        morph_type: String,
        id: String,
    },
    MorphMany {
        target: String,
        name: String,
        morph_type: String,
        id: String,
    },
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self {
            Relation::HasOne { .. } => RelationKind::HasOne,
            Relation::HasMany { .. } => RelationKind::HasMany,
            Relation::BelongsTo { .. } => RelationKind::BelongsTo,
            Relation::BelongsToMany { .. } => RelationKind::BelongsToMany,
            Relation::MorphTo { .. } => RelationKind::MorphTo,
            Relation::MorphOne { .. } => RelationKind::MorphOne,
            Relation::MorphMany { .. } => RelationKind::MorphMany,
        }
    }

    /// Target model, absent for `MorphTo` which reads it from the row
    pub fn target(&self) -> Option<&str> {
        match self {
            Relation::HasOne { target, .. }
            | Relation::HasMany { target, .. }
            | Relation::BelongsTo { target, .. }
            | Relation::BelongsToMany { target, .. }
            | Relation::MorphOne { target, .. }
            | Relation::MorphMany { target, .. } => Some(target),
            Relation::MorphTo { .. } => None,
        }
    }
}

/// A relation bound to the model and name it was declared under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationHandle {
    parent: String,
    name: String,
    relation: Relation,
}

fn owner_key(model: &str) -> String {
    format!("{}_id", model.to_snake_case())
}

impl RelationHandle {
    fn build(parent: &str, name: &str, relation: Relation) -> Self {
        Self {
            parent: parent.to_string(),
            name: name.to_string(),
            relation,
        }
    }

    /// Foreign key defaults to `{parent}_id` in snake case
    pub fn has_one(parent: &str, name: &str, target: &str, foreign_key: Option<&str>) -> Self {
        let foreign_key = foreign_key.map_or_else(|| owner_key(parent), str::to_string);
        Self::build(
            parent,
            name,
            Relation::HasOne {
                target: target.to_string(),
                foreign_key,
            },
        )
    }

    /// Foreign key defaults to `{parent}_id` in snake case
    pub fn has_many(parent: &str, name: &str, target: &str, foreign_key: Option<&str>) -> Self {
        let foreign_key = foreign_key.map_or_else(|| owner_key(parent), str::to_string);
        Self::build(
            parent,
            name,
            Relation::HasMany {
                target: target.to_string(),
                foreign_key,
            },
        )
    }

    /// Foreign key defaults to `{relation name}_id`, so `billingAddress`
    /// reads `billing_address_id`
    pub fn belongs_to(parent: &str, name: &str, target: &str, foreign_key: Option<&str>) -> Self {
        let foreign_key = foreign_key.map_or_else(|| owner_key(name), str::to_string);
        Self::build(
            parent,
            name,
            Relation::BelongsTo {
                target: target.to_string(),
                foreign_key,
            },
        )
    }

    pub fn belongs_to_many(
        parent: &str,
        name: &str,
        target: &str,
        table: &str,
        foreign_key: &str,
        other_key: &str,
    ) -> Self {
        Self::build(
            parent,
            name,
            Relation::BelongsToMany {
                target: target.to_string(),
                table: table.to_string(),
                foreign_key: foreign_key.to_string(),
                other_key: other_key.to_string(),
                pivot_columns: Vec::new(),
                timestamps: false,
            },
        )
    }

    /// Morph name defaults to the relation name in snake case, and the
    /// columns to `{morph name}_type` and `{morph name}_id`
    pub fn morph_to(
        parent: &str,
        name: &str,
        morph_name: Option<&str>,
        morph_type: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        let (morph_name, morph_type, id) = morph_keys(name, morph_name, morph_type, id);
        Self::build(
            parent,
            name,
            Relation::MorphTo {
                name: morph_name,
                morph_type,
                id,
            },
        )
    }

    pub fn morph_one(
        parent: &str,
        name: &str,
        target: &str,
        morph_name: Option<&str>,
        morph_type: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        let (morph_name, morph_type, id) = morph_keys(name, morph_name, morph_type, id);
        Self::build(
            parent,
            name,
            Relation::MorphOne {
                target: target.to_string(),
                name: morph_name,
                morph_type,
                id,
            },
        )
    }

    pub fn morph_many(
        parent: &str,
        name: &str,
        target: &str,
        morph_name: Option<&str>,
        morph_type: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        let (morph_name, morph_type, id) = morph_keys(name, morph_name, morph_type, id);
        Self::build(
            parent,
            name,
            Relation::MorphMany {
                target: target.to_string(),
                name: morph_name,
                morph_type,
                id,
            },
        )
    }

    /// Select extra pivot columns. No-op on other kinds.
    pub fn with_pivot<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Relation::BelongsToMany { pivot_columns, .. } = &mut self.relation {
            pivot_columns.extend(columns.into_iter().map(Into::into));
        }
        self
    }

    /// Track pivot timestamps. No-op on other kinds.
    pub fn with_timestamps(mut self) -> Self {
        if let Relation::BelongsToMany { timestamps, .. } = &mut self.relation {
            *timestamps = true;
        }
        self
    }

    /// Model the relation was declared on
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Name the relation was declared under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn kind(&self) -> RelationKind {
        self.relation.kind()
    }

    pub fn is_collection(&self) -> bool {
        self.kind().is_collection()
    }

    /// Pull the related row(s) through the loader
    pub async fn fetch(&self, loader: &dyn RelationLoader, parent: &Attributes) -> ModelResult<RelationValue> {
        if self.is_collection() {
            Ok(RelationValue::Many(loader.load_many(self, parent).await?))
        } else {
            Ok(RelationValue::One(loader.load_one(self, parent).await?))
        }
    }
}

fn morph_keys(
    relation_name: &str,
    morph_name: Option<&str>,
    morph_type: Option<&str>,
    id: Option<&str>,
) -> (String, String, String) {
    let morph_name = morph_name.map_or_else(|| relation_name.to_snake_case(), str::to_string);
    let morph_type = morph_type.map_or_else(|| format!("{}_type", morph_name), str::to_string);
    let id = id.map_or_else(|| format!("{}_id", morph_name), str::to_string);
    (morph_name, morph_type, id)
}
