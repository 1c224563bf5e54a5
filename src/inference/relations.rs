//! Relationship detection
//!
//! Classifies array- and object-valued fields of a sampled record as to-many
//! or to-one links and derives the canonical foreign-key names used across
//! every importer.

use serde_json::Value;

use super::shape::ValueShape;
use crate::naming::{singularize, to_pascal_case, to_snake_case};

/// Foreign-key name used when no owning entity name is available.
pub const FALLBACK_FOREIGN_KEY: &str = "parent_id";

/// Primary-key name assumed for local and owner keys.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Classification of one field of a sampled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// A plain scalar or json-typed attribute, not a relationship.
    Attribute,
    /// A to-many link; the foreign key lives on the related (child) entity.
    ToMany {
        related: String,
        foreign_key: String,
        local_key: String,
    },
    /// A to-one link; the foreign key lives on this (owning) entity.
    ToOne {
        related: String,
        foreign_key: String,
        owner_key: String,
    },
}

/// Canonical foreign-key name for a reference:
/// `singularize(snake_case(reference)) + "_id"`.
///
/// Snake-casing runs first so capital word boundaries survive the
/// lowercasing singularizer (`BlogPosts` -> `blog_posts` -> `blog_post_id`).
pub fn foreign_key_name(reference: &str) -> String {
    format!("{}_id", singularize(&to_snake_case(reference)))
}

/// Canonical entity name for a reference: Pascal-case singular.
pub fn related_entity_name(reference: &str) -> String {
    to_pascal_case(&singularize(&to_snake_case(reference)))
}

/// Classify a single field of a sampled record.
///
/// A non-empty array of objects is a to-many; an object is a to-one;
/// everything else (scalars, scalar lists, empty arrays) is an attribute.
/// An empty array can never be detected as to-many from a single sample.
pub fn classify_field(field_name: &str, value: &Value, owner: Option<&str>) -> FieldRole {
    match ValueShape::of(value) {
        ValueShape::ObjectList => FieldRole::ToMany {
            related: related_entity_name(field_name),
            foreign_key: owner
                .map(foreign_key_name)
                .unwrap_or_else(|| FALLBACK_FOREIGN_KEY.to_string()),
            local_key: DEFAULT_PRIMARY_KEY.to_string(),
        },
        ValueShape::Object => FieldRole::ToOne {
            related: related_entity_name(field_name),
            foreign_key: foreign_key_name(field_name),
            owner_key: DEFAULT_PRIMARY_KEY.to_string(),
        },
        ValueShape::Scalar | ValueShape::ScalarList => FieldRole::Attribute,
    }
}

/// Classify every field of an object, preserving field order.
pub fn detect_relations(
    fields: &serde_json::Map<String, Value>,
    owner: Option<&str>,
) -> Vec<(String, FieldRole)> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), classify_field(name, value, owner)))
        .collect()
}
