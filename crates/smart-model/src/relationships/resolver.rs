//! Descriptor to handle resolution
//!
//! Checks a descriptor against its kind's contract and dispatches to the
//! matching `RelationHandle` constructor. The relation name is passed in
//! explicitly because `belongs_to` and `morph_to` infer keys from it.

use tracing::{debug, trace};

use super::descriptor::{RelationDescriptor, RelationTable};
use super::handle::RelationHandle;
use super::kind::RelationKind;
use crate::error::RelationError;
use crate::model::ModelDefinition;

/// Resolves relations declared on one model type
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'a> {
    model: &'a str,
    table: &'a RelationTable,
}

impl<'a> RelationResolver<'a> {
    pub fn new(model: &'a str, table: &'a RelationTable) -> Self {
        Self { model, table }
    }

    pub fn for_model<M: ModelDefinition>() -> RelationResolver<'static> {
        RelationResolver::new(M::model_name(), M::relations())
    }

    pub fn table(&self) -> &'a RelationTable {
        self.table
    }

    /// Resolve the relation declared as `name`
    pub fn resolve(&self, name: &str) -> Result<RelationHandle, RelationError> {
        let descriptor = self.table.get(name).ok_or_else(|| RelationError::UnknownRelation {
            model: self.model.to_string(),
            relation: name.to_string(),
        })?;
        self.resolve_descriptor(name, descriptor)
    }

    /// Resolve a descriptor that is not necessarily in the table
    pub fn resolve_descriptor(
        &self,
        name: &str,
        descriptor: &RelationDescriptor,
    ) -> Result<RelationHandle, RelationError> {
        let kind: RelationKind = descriptor
            .kind
            .parse()
            .map_err(|kind| RelationError::InvalidRelationKind {
                model: self.model.to_string(),
                relation: name.to_string(),
                kind,
            })?;

        let target = match (kind.requires_target(), descriptor.target.as_deref()) {
            (true, Some(target)) => target,
            (true, None) => {
                return Err(RelationError::MissingTargetType {
                    model: self.model.to_string(),
                    relation: name.to_string(),
                    kind,
                })
            }
            (false, Some(_)) => {
                return Err(RelationError::UnexpectedArgument {
                    model: self.model.to_string(),
                    relation: name.to_string(),
                    kind,
                    argument: "target".to_string(),
                })
            }
            (false, None) => "",
        };

        let missing: Vec<String> = kind
            .required_fields()
            .iter()
            .filter(|field| !descriptor.has_field(field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RelationError::MissingRequiredField {
                model: self.model.to_string(),
                relation: name.to_string(),
                kind,
                fields: missing,
            });
        }

        trace!("Resolving {} relation '{}' on {}", kind, name, self.model);

        let model = self.model;
        let d = descriptor;
        let handle = match kind {
            RelationKind::HasOne => RelationHandle::has_one(model, name, target, d.foreign_key.as_deref()),
            RelationKind::HasMany => RelationHandle::has_many(model, name, target, d.foreign_key.as_deref()),
            RelationKind::BelongsTo => RelationHandle::belongs_to(model, name, target, d.foreign_key.as_deref()),
            RelationKind::BelongsToMany => {
                let mut handle = RelationHandle::belongs_to_many(
                    model,
                    name,
                    target,
                    required(&d.table),
                    required(&d.foreign_key),
                    required(&d.other_key),
                );
                if let Some(keys) = d.pivot_keys.as_ref().filter(|keys| !keys.is_empty()) {
                    handle = handle.with_pivot(keys.iter().cloned());
                }
                if d.timestamps.unwrap_or(false) {
                    handle = handle.with_timestamps();
                }
                handle
            }
            RelationKind::MorphTo => RelationHandle::morph_to(
                model,
                name,
                d.name.as_deref(),
                d.morph_type.as_deref(),
                d.id.as_deref(),
            ),
            RelationKind::MorphOne => RelationHandle::morph_one(
                model,
                name,
                target,
                d.name.as_deref(),
                d.morph_type.as_deref(),
                d.id.as_deref(),
            ),
            RelationKind::MorphMany => RelationHandle::morph_many(
                model,
                name,
                target,
                d.name.as_deref(),
                d.morph_type.as_deref(),
                d.id.as_deref(),
            ),
        };

        debug!("Resolved relation '{}' on {} as {}", name, self.model, kind);
        Ok(handle)
    }
}

/// Presence was checked against the kind's required fields
fn required(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::Relation;

    fn table() -> RelationTable {
        RelationTable::new()
            .relation("items", RelationDescriptor::has_many("Item").foreign_key("order_id"))
            .relation("customer", RelationDescriptor::belongs_to("Customer"))
            .relation(
                "tags",
                RelationDescriptor::belongs_to_many("Tag", "order_tag", "order_id", "tag_id")
                    .pivot_keys(Vec::<String>::new())
                    .timestamps(true),
            )
    }

    #[test]
    fn test_unknown_relation() {
        let table = table();
        let err = RelationResolver::new("Order", &table).resolve("ghost").unwrap_err();
        assert_eq!(
            err,
            RelationError::UnknownRelation {
                model: "Order".to_string(),
                relation: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_resolves_explicit_and_inferred_keys() {
        let table = table();
        let resolver = RelationResolver::new("Order", &table);

        let items = resolver.resolve("items").unwrap();
        assert_eq!(items.name(), "items");
        assert_eq!(items.parent(), "Order");
        assert!(matches!(items.relation(), Relation::HasMany { foreign_key, .. } if foreign_key == "order_id"));

        let customer = resolver.resolve("customer").unwrap();
        assert!(matches!(customer.relation(), Relation::BelongsTo { foreign_key, .. } if foreign_key == "customer_id"));
    }

    #[test]
    fn test_empty_pivot_list_is_not_attached() {
        let table = table();
        let tags = RelationResolver::new("Order", &table).resolve("tags").unwrap();
        assert!(matches!(
            tags.relation(),
            Relation::BelongsToMany { pivot_columns, timestamps: true, .. } if pivot_columns.is_empty()
        ));
    }
}
