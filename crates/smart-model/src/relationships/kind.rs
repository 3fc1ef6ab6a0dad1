//! The seven relation kinds and their argument contracts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defines the type of relationship between models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// One-to-one, foreign key on the related row
    HasOne,
    /// One-to-many, foreign key on the related rows
    HasMany,
    /// Inverse of has-one/has-many, foreign key on this row
    BelongsTo,
    /// Many-to-many through a pivot table
    BelongsToMany,
    /// Inverse polymorphic relationship
    MorphTo,
    /// Polymorphic one-to-one
    MorphOne,
    /// Polymorphic one-to-many
    MorphMany,
}

/// Descriptor field names as they appear in descriptor tables
pub mod fields {
    pub const FOREIGN_KEY: &str = "foreignKey";
    pub const TABLE: &str = "table";
    pub const OTHER_KEY: &str = "otherKey";
    pub const PIVOT_KEYS: &str = "pivotKeys";
    pub const TIMESTAMPS: &str = "timestamps";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const ID: &str = "id";
}

impl RelationKind {
    pub const ALL: [RelationKind; 7] = [
        RelationKind::HasOne,
        RelationKind::HasMany,
        RelationKind::BelongsTo,
        RelationKind::BelongsToMany,
        RelationKind::MorphTo,
        RelationKind::MorphOne,
        RelationKind::MorphMany,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
            Self::BelongsTo => "belongsTo",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphTo => "morphTo",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
        }
    }

    /// Returns true if this relationship returns a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany | Self::MorphMany)
    }

    /// Returns true if this relationship type is polymorphic
    pub fn is_polymorphic(self) -> bool {
        matches!(self, Self::MorphTo | Self::MorphOne | Self::MorphMany)
    }

    /// Every kind but `MorphTo` names its target model
    pub fn requires_target(self) -> bool {
        !matches!(self, Self::MorphTo)
    }

    /// Fields a descriptor must carry, in reporting order
    pub fn required_fields(self) -> &'static [&'static str] {
        use fields::*;
        match self {
            Self::HasOne | Self::HasMany | Self::BelongsTo => &[],
            Self::BelongsToMany => &[TABLE, FOREIGN_KEY, OTHER_KEY],
            Self::MorphTo => &[NAME, TYPE, ID],
            Self::MorphOne | Self::MorphMany => &[TYPE, ID],
        }
    }

    /// Fields a descriptor may omit; they default to null or false
    pub fn optional_fields(self) -> &'static [&'static str] {
        use fields::*;
        match self {
            Self::HasOne | Self::HasMany | Self::BelongsTo => &[FOREIGN_KEY],
            Self::BelongsToMany => &[PIVOT_KEYS, TIMESTAMPS],
            Self::MorphTo => &[],
            Self::MorphOne | Self::MorphMany => &[NAME],
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `hasMany`, `has_many`, `HasMany` and `HAS_MANY` alike
impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_lowercase() == normalized)
            .ok_or_else(|| s.to_string())
    }
}
