//! Integration tests for descriptor resolution
//!
//! Covers every relation kind against a table loaded from YAML, plus the
//! descriptor errors surfaced at access time.

use smart_model::{
    Relation, RelationDescriptor, RelationError, RelationKind, RelationResolver, RelationTable,
};

const POST_RELATIONS: &str = r#"
author:
  kind: belongsTo
  target: User
comments:
  kind: hasMany
  target: Comment
summary:
  kind: hasOne
  target: Summary
  foreignKey: article_id
tags:
  kind: belongsToMany
  target: Tag
  table: post_tag
  foreignKey: post_id
  otherKey: tag_id
  pivotKeys: [weight]
  timestamps: true
commentable:
  kind: morphTo
  name: commentable
  type: commentable_type
  id: commentable_id
cover:
  kind: morphOne
  target: Image
  type: imageable_type
  id: imageable_id
attachments:
  kind: morphMany
  target: Attachment
  name: owner
  type: owner_type
  id: owner_id
"#;

fn post_table() -> RelationTable {
    RelationTable::from_yaml_str(POST_RELATIONS).expect("relation table should parse")
}

#[test]
fn test_resolves_all_seven_kinds() {
    let table = post_table();
    let resolver = RelationResolver::new("BlogPost", &table);

    let author = resolver.resolve("author").unwrap();
    assert_eq!(
        author.relation(),
        &Relation::BelongsTo {
            target: "User".to_string(),
            foreign_key: "author_id".to_string(),
        }
    );

    let comments = resolver.resolve("comments").unwrap();
    assert!(comments.is_collection());
    assert_eq!(
        comments.relation(),
        &Relation::HasMany {
            target: "Comment".to_string(),
            foreign_key: "blog_post_id".to_string(),
        }
    );

    let summary = resolver.resolve("summary").unwrap();
    assert_eq!(
        summary.relation(),
        &Relation::HasOne {
            target: "Summary".to_string(),
            foreign_key: "article_id".to_string(),
        }
    );

    let tags = resolver.resolve("tags").unwrap();
    assert_eq!(
        tags.relation(),
        &Relation::BelongsToMany {
            target: "Tag".to_string(),
            table: "post_tag".to_string(),
            foreign_key: "post_id".to_string(),
            other_key: "tag_id".to_string(),
            pivot_columns: vec!["weight".to_string()],
            timestamps: true,
        }
    );

    let commentable = resolver.resolve("commentable").unwrap();
    assert_eq!(commentable.kind(), RelationKind::MorphTo);
    assert_eq!(commentable.relation().target(), None);

    let cover = resolver.resolve("cover").unwrap();
    assert_eq!(
        cover.relation(),
        &Relation::MorphOne {
            target: "Image".to_string(),
            name: "cover".to_string(),
            morph_type: "imageable_type".to_string(),
            id: "imageable_id".to_string(),
        }
    );

    let attachments = resolver.resolve("attachments").unwrap();
    assert!(attachments.is_collection());
    assert_eq!(attachments.parent(), "BlogPost");
    assert_eq!(attachments.name(), "attachments");
    assert_eq!(attachments.relation().target(), Some("Attachment"));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let table = RelationTable::new().relation("friends", RelationDescriptor::new("hasSeveral").target("User"));
    let err = RelationResolver::new("User", &table).resolve("friends").unwrap_err();

    assert_eq!(
        err,
        RelationError::InvalidRelationKind {
            model: "User".to_string(),
            relation: "friends".to_string(),
            kind: "hasSeveral".to_string(),
        }
    );
}

#[test]
fn test_target_is_required_except_for_morph_to() {
    let table = RelationTable::new()
        .relation("owner", RelationDescriptor::new("belongsTo"))
        .relation("photo", RelationDescriptor::new("morphOne").morph_type("t").id("i"));
    let resolver = RelationResolver::new("Pet", &table);

    for (name, kind) in [("owner", RelationKind::BelongsTo), ("photo", RelationKind::MorphOne)] {
        assert_eq!(
            resolver.resolve(name).unwrap_err(),
            RelationError::MissingTargetType {
                model: "Pet".to_string(),
                relation: name.to_string(),
                kind,
            }
        );
    }
}

#[test]
fn test_morph_to_with_target_is_rejected() {
    let table = RelationTable::new().relation(
        "subject",
        RelationDescriptor::morph_to("subject", "subject_type", "subject_id").target("Post"),
    );
    let err = RelationResolver::new("Activity", &table).resolve("subject").unwrap_err();

    assert!(matches!(
        err,
        RelationError::UnexpectedArgument { ref argument, kind: RelationKind::MorphTo, .. } if argument == "target"
    ));
}

#[test]
fn test_missing_fields_are_reported_together() {
    let table = RelationTable::new()
        .relation("roles", RelationDescriptor::new("belongsToMany").target("Role").table("role_user"))
        .relation("subject", RelationDescriptor::new("morphTo").name("subject"))
        .relation("notes", RelationDescriptor::new("morphMany").target("Note"))
        .relation("avatar", RelationDescriptor::new("morphOne").target("Image"))
        .relation("banner", RelationDescriptor::new("morphOne").target("Image").morph_type("bannerable_type"));
    let resolver = RelationResolver::new("User", &table);

    let missing = |name: &str| match resolver.resolve(name) {
        Err(RelationError::MissingRequiredField { fields, .. }) => fields,
        other => panic!("expected missing fields for '{}', got {:?}", name, other),
    };

    assert_eq!(missing("roles"), vec!["foreignKey", "otherKey"]);
    assert_eq!(missing("subject"), vec!["type", "id"]);
    assert_eq!(missing("notes"), vec!["type", "id"]);
    assert_eq!(missing("avatar"), vec!["type", "id"]);
    assert_eq!(missing("banner"), vec!["id"]);

    let err = resolver.resolve("roles").unwrap_err();
    assert!(err.to_string().ends_with("missing required field(s): foreignKey, otherKey"));
}

#[test]
fn test_unknown_relation_name() {
    let table = post_table();
    let err = RelationResolver::new("BlogPost", &table).resolve("likes").unwrap_err();
    assert_eq!(
        err,
        RelationError::UnknownRelation {
            model: "BlogPost".to_string(),
            relation: "likes".to_string(),
        }
    );
}

#[test]
fn test_json_table_matches_builder_table() {
    let from_json = RelationTable::from_json_str(
        r#"{"roles": {"kind": "belongsToMany", "target": "Role", "table": "role_user",
                      "foreignKey": "user_id", "otherKey": "role_id"}}"#,
    )
    .unwrap();
    let built = RelationTable::new().relation(
        "roles",
        RelationDescriptor::belongs_to_many("Role", "role_user", "user_id", "role_id"),
    );

    assert_eq!(from_json, built);
}
