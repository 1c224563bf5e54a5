//! JSON-sample importer
//!
//! Recursively walks a decoded JSON document, treating keyed structures as
//! candidate entities, scalar members as fields, and nested object/array
//! members as relationships. Re-encountering an entity name merges fields
//! first-writer-wins rather than overwriting.

use serde_json::{Map, Value};

use crate::inference::{FieldRole, InferenceConfig, InferenceError, SourceKind, ValueShape, classify_field};
use crate::models::{EntityGraph, Field, Relation};
use crate::naming::{pluralize, singularize, to_camel_case, to_snake_case};

/// Hard ceiling on nested-entity recursion. Deeper branches are truncated,
/// not failed, so one pathological document cannot abort the whole parse.
pub const MAX_DEPTH: usize = 10;

/// JSON-sample importer
#[derive(Debug, Default)]
pub struct JSONSampleImporter {
    config: InferenceConfig,
}

impl JSONSampleImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Parse a raw JSON document into an entity graph.
    pub fn parse(&self, input: &str) -> Result<EntityGraph, InferenceError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| InferenceError::malformed(SourceKind::Json, e.to_string()))?;
        self.parse_value(&value, None)
    }

    /// Parse an already-decoded JSON document, optionally naming the root
    /// entity when the document root is itself a record.
    pub fn parse_value(
        &self,
        value: &Value,
        root_hint: Option<&str>,
    ) -> Result<EntityGraph, InferenceError> {
        let mut graph = EntityGraph::new();
        match value {
            Value::Object(obj) => {
                // A root object carrying scalar members is a record in its
                // own right; a pure wrapper (every value object-shaped) only
                // contributes the entities behind its keys.
                let is_record = obj.is_empty()
                    || obj.values().any(|v| {
                        matches!(ValueShape::of(v), ValueShape::Scalar | ValueShape::ScalarList)
                    });
                if is_record {
                    let hint = root_hint.unwrap_or(&self.config.root_entity_name);
                    self.extract_object(hint, obj, None, 0, &mut graph);
                } else {
                    for (key, member) in obj {
                        self.extract_candidate(key, member, None, 0, &mut graph);
                    }
                }
            }
            Value::Array(items) => {
                let hint = root_hint.unwrap_or(&self.config.root_entity_name);
                for item in items {
                    if let Some(obj) = item.as_object() {
                        self.extract_object(hint, obj, None, 0, &mut graph);
                    }
                }
            }
            other => {
                return Err(InferenceError::malformed(
                    SourceKind::Json,
                    format!("document root must be an object or array, found {}", value_kind(other)),
                ));
            }
        }
        Ok(graph)
    }

    /// Extract an entity (or entity samples) from one candidate value.
    fn extract_candidate(
        &self,
        reference: &str,
        value: &Value,
        parent: Option<&str>,
        depth: usize,
        graph: &mut EntityGraph,
    ) {
        match value {
            Value::Object(obj) => {
                self.extract_object(reference, obj, parent, depth, graph);
            }
            Value::Array(items) => {
                for item in items {
                    if let Some(obj) = item.as_object() {
                        self.extract_object(reference, obj, parent, depth, graph);
                    }
                }
            }
            _ => {}
        }
    }

    /// Extract fields and relationships from one observed record, merging
    /// into an already-registered entity of the same canonical name.
    pub(crate) fn extract_object(
        &self,
        reference: &str,
        obj: &Map<String, Value>,
        parent: Option<&str>,
        depth: usize,
        graph: &mut EntityGraph,
    ) -> String {
        let entity_name = graph.ensure(reference, parent);

        for (key, value) in obj {
            match classify_field(key, value, Some(&entity_name)) {
                FieldRole::ToMany {
                    related,
                    foreign_key,
                    ..
                } => {
                    if depth >= MAX_DEPTH {
                        tracing::warn!(entity = %entity_name, field = %key, "recursion ceiling reached, truncating branch");
                        continue;
                    }
                    self.extract_candidate(key, value, Some(&entity_name), depth + 1, graph);
                    if let Some(child) = graph.get_mut(&related) {
                        child.push_field(Field::foreign_key(&foreign_key));
                        child.push_relation(Relation::to_one(
                            &entity_name,
                            owner_accessor(&entity_name),
                            &foreign_key,
                        ));
                    }
                    if let Some(owner) = graph.get_mut(&entity_name) {
                        owner.push_relation(Relation::to_many(
                            &related,
                            to_camel_case(key),
                            &foreign_key,
                        ));
                    }
                }
                FieldRole::ToOne {
                    related,
                    foreign_key,
                    ..
                } => {
                    if depth >= MAX_DEPTH {
                        tracing::warn!(entity = %entity_name, field = %key, "recursion ceiling reached, truncating branch");
                        continue;
                    }
                    self.extract_candidate(key, value, Some(&entity_name), depth + 1, graph);
                    if let Some(owner) = graph.get_mut(&entity_name) {
                        owner.push_field(Field::foreign_key(&foreign_key));
                        owner.push_relation(Relation::to_one(
                            &related,
                            to_camel_case(&singularize(&to_snake_case(key))),
                            &foreign_key,
                        ));
                    }
                    if let Some(other) = graph.get_mut(&related) {
                        other.push_relation(Relation::to_many(
                            &entity_name,
                            collection_accessor(&entity_name),
                            &foreign_key,
                        ));
                    }
                }
                FieldRole::Attribute => {
                    let field_name = to_snake_case(key);
                    let field = Field::inferred(&field_name, value, self.config.collect_samples);
                    if let Some(entity) = graph.get_mut(&entity_name) {
                        entity.push_field(field);
                    }
                }
            }
        }

        entity_name
    }
}

/// Accessor for a to-one back-reference to an owner entity (`User` -> `user`).
fn owner_accessor(entity_name: &str) -> String {
    to_camel_case(&to_snake_case(entity_name))
}

/// Accessor for a reciprocal to-many collection (`Post` -> `posts`).
fn collection_accessor(entity_name: &str) -> String {
    to_camel_case(&pluralize(&to_snake_case(entity_name)))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Cast, StorageType};

    #[test]
    fn test_scalar_root_is_rejected() {
        let importer = JSONSampleImporter::new();
        let err = importer.parse("42").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedInput { .. }));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let importer = JSONSampleImporter::new();
        let err = importer.parse("{not json").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedInput { .. }));
    }

    #[test]
    fn test_record_shaped_root_uses_fallback_name() {
        let importer = JSONSampleImporter::new();
        let graph = importer.parse(r#"{"id": 1, "title": "Hi"}"#).unwrap();
        assert_eq!(graph.names(), vec!["Record"]);
    }

    #[test]
    fn test_root_array_uses_hint() {
        let importer = JSONSampleImporter::new();
        let value: Value = serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        let graph = importer.parse_value(&value, Some("products")).unwrap();
        assert_eq!(graph.names(), vec!["Product"]);
    }

    #[test]
    fn test_nested_object_becomes_to_one() {
        let importer = JSONSampleImporter::new();
        let graph = importer
            .parse(r#"{"posts": [{"id": 1, "author": {"id": 2, "name": "x"}}]}"#)
            .unwrap();

        let post = graph.get("Post").unwrap();
        assert!(post.has_field("author_id"));
        let rel = post.relation("author").unwrap();
        assert!(rel.is_to_one());
        assert_eq!(rel.related_entity, "Author");

        let author = graph.get("Author").unwrap();
        let back = author.relation("posts").unwrap();
        assert!(back.is_to_many());
        assert_eq!(back.related_entity, "Post");
        assert_eq!(author.parent.as_deref(), Some("Post"));
    }

    #[test]
    fn test_multiword_entity_names_keep_word_boundaries() {
        let importer = JSONSampleImporter::new();
        let graph = importer
            .parse(r#"{"blog_posts": [{"id": 1, "text": "Hi", "comments": [{"id": 2, "text": "Nice"}]}]}"#)
            .unwrap();

        assert!(graph.contains("BlogPost"));
        let post = graph.get("BlogPost").unwrap();
        assert_eq!(post.table, "blog_posts");

        let comment = graph.get("Comment").unwrap();
        let names: Vec<&str> = comment.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "text", "blog_post_id"]);
        assert_eq!(comment.relation("blogPost").unwrap().foreign_key, "blog_post_id");
    }

    #[test]
    fn test_scalar_list_is_json_field() {
        let importer = JSONSampleImporter::new();
        let graph = importer
            .parse(r#"{"posts": [{"id": 1, "tags": ["a", "b"]}]}"#)
            .unwrap();
        let post = graph.get("Post").unwrap();
        let tags = post.field("tags").unwrap();
        assert_eq!(tags.storage_type, StorageType::Json);
        assert_eq!(tags.cast, Some(Cast::Array));
        assert!(post.relations.is_empty());
    }

    #[test]
    fn test_depth_ceiling_truncates_instead_of_failing() {
        // Build a document nested beyond the ceiling.
        let mut doc = String::from(r#"{"id": 1"#);
        for i in 0..(MAX_DEPTH + 3) {
            doc.push_str(&format!(r#", "level{i}": {{"id": {i}"#));
        }
        doc.push_str(&"}".repeat(MAX_DEPTH + 3));
        doc.push('}');

        let importer = JSONSampleImporter::new();
        let graph = importer.parse(&doc).unwrap();
        // Parse succeeds and stops adding entities at the ceiling.
        assert!(graph.len() <= MAX_DEPTH + 2);
    }

    #[test]
    fn test_sample_values_follow_config() {
        let importer = JSONSampleImporter::with_config(
            InferenceConfig::builder().collect_samples(false).build(),
        );
        let graph = importer.parse(r#"{"users": [{"name": "Ada"}]}"#).unwrap();
        assert_eq!(graph.get("User").unwrap().field("name").unwrap().sample_value, None);
    }
}
