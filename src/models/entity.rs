//! Entity model

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::field::Field;
use super::relationship::Relation;
use crate::inference::{AUTHOR_LINK_FIELDS, Cast};
use crate::naming::{pluralize, singularize, to_pascal_case, to_snake_case};

/// A named record type inferred from one or more observations.
///
/// Fields keep their insertion order; the `casts` map is maintained as the
/// derived subset of fields carrying a cast, so every cast key resolves to a
/// field.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Canonical singular Pascal-case identifier, unique across the graph
    pub name: String,
    /// Canonical plural lower_snake_case storage identifier
    pub table: String,
    /// Ordered fields; insertion order is generated-output order
    pub fields: Vec<Field>,
    /// Detected relationships
    pub relations: Vec<Relation>,
    /// Field name -> display cast (derived subset of `fields`)
    pub casts: BTreeMap<String, Cast>,
    /// Entity that produced this one during nested extraction, if any
    pub parent: Option<String>,
    /// True when a field names an owning-user foreign key
    pub has_author_link: bool,
}

// The wire contract keys fields by name and relationships by accessor;
// serde_json's preserve_order keeps both in insertion order.
impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.parent.is_some() { 7 } else { 6 };
        let mut state = serializer.serialize_struct("Entity", field_count)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("table", &self.table)?;

        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                serde_json::to_value(f)
                    .map(|v| (f.name.clone(), v))
                    .map_err(serde::ser::Error::custom)
            })
            .collect::<Result<_, S::Error>>()?;
        state.serialize_field("fields", &fields)?;

        let relationships: serde_json::Map<String, serde_json::Value> = self
            .relations
            .iter()
            .map(|r| {
                serde_json::to_value(r)
                    .map(|v| (r.accessor.clone(), v))
                    .map_err(serde::ser::Error::custom)
            })
            .collect::<Result<_, S::Error>>()?;
        state.serialize_field("relationships", &relationships)?;

        state.serialize_field("casts", &self.casts)?;
        if let Some(parent) = &self.parent {
            state.serialize_field("parent", parent)?;
        } else {
            state.skip_field("parent")?;
        }
        state.serialize_field("hasAuthorLink", &self.has_author_link)?;
        state.end()
    }
}

/// Canonical entity name for an arbitrary reference word.
///
/// Snake-casing runs before the lowercasing singularizer so capital word
/// boundaries survive (`BlogPosts` -> `blog_posts` -> `BlogPost`).
pub fn canonical_entity_name(reference: &str) -> String {
    to_pascal_case(&singularize(&to_snake_case(reference)))
}

impl Entity {
    /// Create an empty entity; the name is canonicalized to singular
    /// Pascal-case and the table to plural snake_case.
    pub fn new(reference: &str) -> Self {
        let name = canonical_entity_name(reference);
        let table = pluralize(&to_snake_case(&name));
        Self {
            name,
            table,
            fields: Vec::new(),
            relations: Vec::new(),
            casts: BTreeMap::new(),
            parent: None,
            has_author_link: false,
        }
    }

    pub fn with_parent(mut self, parent: Option<&str>) -> Self {
        self.parent = parent.map(|p| p.to_string());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn relation(&self, accessor: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.accessor == accessor)
    }

    /// Add a field unless one with the same name exists (first-writer-wins).
    /// Returns true if the field was added.
    pub fn push_field(&mut self, field: Field) -> bool {
        if self.has_field(&field.name) {
            return false;
        }
        if let Some(cast) = field.cast {
            self.casts.insert(field.name.clone(), cast);
        }
        if AUTHOR_LINK_FIELDS.contains(&field.name.as_str()) {
            self.has_author_link = true;
        }
        self.fields.push(field);
        true
    }

    /// Add a relation unless one with the same accessor exists.
    /// Returns true if the relation was added.
    pub fn push_relation(&mut self, relation: Relation) -> bool {
        if self.relation(&relation.accessor).is_some() {
            return false;
        }
        self.relations.push(relation);
        true
    }

    /// Merge another observation of this entity, first-writer-wins and
    /// append-only: existing fields and relations are never overwritten.
    pub fn merge(&mut self, other: Entity) {
        for field in other.fields {
            self.push_field(field);
        }
        for relation in other.relations {
            self.push_relation(relation);
        }
        if self.parent.is_none() {
            self.parent = other.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{LanguageType, StorageType};

    #[test]
    fn test_canonical_naming() {
        let entity = Entity::new("users");
        assert_eq!(entity.name, "User");
        assert_eq!(entity.table, "users");

        let entity = Entity::new("BlogPosts");
        assert_eq!(entity.name, "BlogPost");
        assert_eq!(entity.table, "blog_posts");

        let entity = Entity::new("people");
        assert_eq!(entity.name, "Person");
        assert_eq!(entity.table, "people");
    }

    #[test]
    fn test_first_writer_wins_fields() {
        let mut entity = Entity::new("post");
        assert!(entity.push_field(Field::new("title", LanguageType::String, StorageType::String)));
        assert!(!entity.push_field(Field::new("title", LanguageType::Integer, StorageType::Integer)));
        assert_eq!(entity.fields.len(), 1);
        assert_eq!(entity.field("title").unwrap().storage_type, StorageType::String);
    }

    #[test]
    fn test_casts_track_fields() {
        let mut entity = Entity::new("post");
        entity.push_field(
            Field::new("published", LanguageType::Boolean, StorageType::Boolean)
                .with_cast(Some(Cast::Boolean)),
        );
        entity.push_field(Field::new("title", LanguageType::String, StorageType::String));
        assert_eq!(entity.casts.get("published"), Some(&Cast::Boolean));
        assert!(!entity.casts.contains_key("title"));
        for name in entity.casts.keys() {
            assert!(entity.has_field(name));
        }
    }

    #[test]
    fn test_author_link_detection() {
        let mut entity = Entity::new("post");
        assert!(!entity.has_author_link);
        entity.push_field(Field::foreign_key("user_id"));
        assert!(entity.has_author_link);

        let mut entity = Entity::new("comment");
        entity.push_field(Field::foreign_key("post_id"));
        assert!(!entity.has_author_link);
    }

    #[test]
    fn test_serializes_fields_and_relationships_as_keyed_maps() {
        let mut entity = Entity::new("users");
        entity.push_field(Field::new("id", LanguageType::Integer, StorageType::ForeignId));
        entity.push_field(Field::new("name", LanguageType::String, StorageType::String));
        entity.push_relation(crate::models::Relation::to_many("Post", "posts", "user_id"));

        let value = serde_json::to_value(&entity).unwrap();
        let field_names: Vec<&String> = value["fields"].as_object().unwrap().keys().collect();
        assert_eq!(field_names, ["id", "name"]);
        assert_eq!(value["fields"]["name"]["storageType"], "string");
        assert_eq!(value["relationships"]["posts"]["type"], "toMany");
        assert_eq!(value["hasAuthorLink"], false);
        assert!(value.get("parent").is_none());
    }

    #[test]
    fn test_merge_is_append_only() {
        let mut first = Entity::new("user");
        first.push_field(Field::new("name", LanguageType::String, StorageType::String));

        let mut second = Entity::new("user");
        second.push_field(Field::new("name", LanguageType::Integer, StorageType::Integer));
        second.push_field(Field::new("email", LanguageType::String, StorageType::String));

        first.merge(second);
        assert_eq!(first.fields.len(), 2);
        assert_eq!(first.field("name").unwrap().storage_type, StorageType::String);
        assert!(first.has_field("email"));
    }
}
