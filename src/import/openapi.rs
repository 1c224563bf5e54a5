//! OpenAPI/Swagger importer
//!
//! Accepts an OpenAPI 3.x or Swagger 2.x document in YAML or JSON and turns
//! its object schemas into entities. `$ref` properties become to-one
//! relationships, arrays of `$ref` items become to-many relationships, and
//! plain properties map through a type+format table with nullability derived
//! from the schema's `required` list.

use serde_json::{Map, Value};

use crate::inference::{Cast, InferenceError, LanguageType, SourceKind, StorageType, is_key_field};
use crate::models::{EntityGraph, Field, Relation, canonical_entity_name};
use crate::naming::{singularize, to_camel_case, to_snake_case};

/// Vendor extension marking a schema to be excluded from entity extraction.
const SKIP_EXTENSION: &str = "x-ignore";

/// OpenAPI/Swagger importer
#[derive(Debug, Default)]
pub struct OpenAPIImporter;

impl OpenAPIImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse an OpenAPI 3.x or Swagger 2.x document into an entity graph.
    pub fn parse(&self, content: &str) -> Result<EntityGraph, InferenceError> {
        let spec = decode(content)?;
        let doc = spec.as_object().ok_or_else(|| {
            InferenceError::malformed(SourceKind::OpenApi, "document root must be an object")
        })?;

        let schemas = schema_map(doc)?;

        let mut graph = EntityGraph::new();
        for (name, schema) in schemas {
            let Some(schema) = schema.as_object() else {
                continue;
            };
            if schema.get(SKIP_EXTENSION).and_then(Value::as_bool) == Some(true) {
                tracing::debug!(schema = %name, "schema marked {SKIP_EXTENSION}, skipping");
                continue;
            }
            // Only object schemas with properties describe entities.
            if schema.get("type").and_then(Value::as_str) != Some("object") {
                continue;
            }
            let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                continue;
            };
            self.extract_schema(&name, properties, required_list(schema), &mut graph);
        }
        Ok(graph)
    }

    fn extract_schema(
        &self,
        name: &str,
        properties: &Map<String, Value>,
        required: Vec<&str>,
        graph: &mut EntityGraph,
    ) {
        let entity_name = graph.ensure(name, None);

        for (prop_name, prop) in properties {
            let Some(prop) = prop.as_object() else {
                continue;
            };

            let nullable = !required.contains(&prop_name.as_str())
                || prop.get("nullable").and_then(Value::as_bool) == Some(true);

            // Direct $ref: a to-one relationship with its key on this entity.
            if let Some(target) = prop.get("$ref").and_then(Value::as_str) {
                let related = canonical_entity_name(ref_name(target));
                let foreign_key = format!("{}_id", singularize(&to_snake_case(prop_name)));
                if let Some(entity) = graph.get_mut(&entity_name) {
                    entity.push_field(Field::foreign_key(&foreign_key).with_nullable(nullable));
                    entity.push_relation(Relation::to_one(
                        &related,
                        to_camel_case(&singularize(&to_snake_case(prop_name))),
                        &foreign_key,
                    ));
                }
                continue;
            }

            // Array of $ref items: a to-many relationship. The key lives on
            // the related schema and is added when that schema is processed.
            let prop_type = prop.get("type").and_then(Value::as_str);
            if prop_type == Some("array") {
                if let Some(target) = prop
                    .get("items")
                    .and_then(Value::as_object)
                    .and_then(|items| items.get("$ref"))
                    .and_then(Value::as_str)
                {
                    let related = canonical_entity_name(ref_name(target));
                    let foreign_key =
                        format!("{}_id", singularize(&to_snake_case(&entity_name)));
                    if let Some(entity) = graph.get_mut(&entity_name) {
                        entity.push_relation(Relation::to_many(
                            &related,
                            to_camel_case(prop_name),
                            &foreign_key,
                        ));
                    }
                    continue;
                }
            }

            let field_name = to_snake_case(prop_name);
            let format = prop.get("format").and_then(Value::as_str);
            let (language_type, storage_type, cast) =
                map_property(prop_type.unwrap_or("string"), format, &field_name);

            if let Some(entity) = graph.get_mut(&entity_name) {
                entity.push_field(
                    Field::new(field_name, language_type, storage_type)
                        .with_nullable(nullable)
                        .with_cast(cast),
                );
            }
        }
    }
}

/// Decode a YAML or JSON envelope. JSON is tried first since it is stricter.
fn decode(content: &str) -> Result<Value, InferenceError> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(value);
    }
    serde_yaml::from_str(content)
        .map_err(|e| InferenceError::malformed(SourceKind::OpenApi, e.to_string()))
}

/// Locate the schema map for the detected spec dialect.
fn schema_map(doc: &Map<String, Value>) -> Result<Map<String, Value>, InferenceError> {
    if doc.contains_key("openapi") {
        Ok(doc
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    } else if doc.contains_key("swagger") {
        Ok(doc
            .get("definitions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    } else {
        Err(InferenceError::unsupported(
            "document has neither an 'openapi' nor a 'swagger' version field",
        ))
    }
}

fn required_list(schema: &Map<String, Value>) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Last segment of a `$ref` pointer (`#/components/schemas/User` -> `User`).
fn ref_name(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

/// Map an OpenAPI type+format pair to the three type descriptors.
fn map_property(
    prop_type: &str,
    format: Option<&str>,
    field_name: &str,
) -> (LanguageType, StorageType, Option<Cast>) {
    match (prop_type, format) {
        ("integer", Some("int64")) => {
            if is_key_field(field_name) {
                (LanguageType::Integer, StorageType::ForeignId, None)
            } else {
                (LanguageType::Integer, StorageType::BigInteger, Some(Cast::Integer))
            }
        }
        ("integer", _) => {
            if is_key_field(field_name) {
                (LanguageType::Integer, StorageType::ForeignId, None)
            } else {
                (LanguageType::Integer, StorageType::Integer, Some(Cast::Integer))
            }
        }
        ("number", Some("float")) => (
            LanguageType::Float,
            StorageType::default_decimal(),
            Some(Cast::Float),
        ),
        ("number", Some("double")) => (LanguageType::Float, StorageType::Double, Some(Cast::Float)),
        ("number", _) => (
            LanguageType::Float,
            StorageType::default_decimal(),
            Some(Cast::Decimal(2)),
        ),
        ("boolean", _) => (LanguageType::Boolean, StorageType::Boolean, Some(Cast::Boolean)),
        ("string", Some("date-time")) => (
            LanguageType::String,
            StorageType::Timestamp,
            Some(Cast::Datetime),
        ),
        ("string", Some("date")) => (LanguageType::String, StorageType::Date, Some(Cast::Date)),
        ("string", Some("uuid")) => (LanguageType::String, StorageType::Uuid, None),
        ("string", Some("binary" | "byte")) => (LanguageType::String, StorageType::Binary, None),
        ("array", _) => (LanguageType::Array, StorageType::Json, Some(Cast::Array)),
        ("object", _) => (LanguageType::Object, StorageType::Json, Some(Cast::Object)),
        _ => (LanguageType::String, StorageType::String, None),
    }
}
