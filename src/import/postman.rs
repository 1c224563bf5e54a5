//! Postman-collection importer
//!
//! Flattens a Postman Collection v2 document (folders included) and derives
//! one candidate entity per request from its URL path. Fields come from the
//! request body (raw JSON, URL-encoded, or multipart form) and from the first
//! recorded response body; response-derived fields take priority, and
//! revisiting a known entity only adds previously-unseen response fields.

use serde_json::{Map, Value};

use super::json_sample::JSONSampleImporter;
use super::request_entity_segment;
use crate::inference::{InferenceConfig, InferenceError, SourceKind};
use crate::models::{EntityGraph, canonical_entity_name};

/// Postman-collection importer
#[derive(Debug, Default)]
pub struct PostmanImporter {
    extractor: JSONSampleImporter,
}

impl PostmanImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            extractor: JSONSampleImporter::with_config(config),
        }
    }

    /// Parse a Postman collection into an entity graph.
    pub fn parse(&self, content: &str) -> Result<EntityGraph, InferenceError> {
        let doc: Value = serde_json::from_str(content)
            .map_err(|e| InferenceError::malformed(SourceKind::Postman, e.to_string()))?;
        let collection = doc.as_object().ok_or_else(|| {
            InferenceError::malformed(SourceKind::Postman, "collection root must be an object")
        })?;
        if !collection.contains_key("info") {
            return Err(InferenceError::malformed(
                SourceKind::Postman,
                "collection is missing the required 'info' key",
            ));
        }
        let items = collection
            .get("item")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                InferenceError::malformed(
                    SourceKind::Postman,
                    "collection is missing the required 'item' key",
                )
            })?;

        let mut graph = EntityGraph::new();
        self.walk_items(items, &mut graph);
        Ok(graph)
    }

    /// Recursively flatten folder nesting and ingest leaf requests.
    fn walk_items(&self, items: &[Value], graph: &mut EntityGraph) {
        for item in items {
            let Some(item) = item.as_object() else {
                continue;
            };
            if let Some(children) = item.get("item").and_then(Value::as_array) {
                self.walk_items(children, graph);
                continue;
            }
            if let Some(request) = item.get("request").and_then(Value::as_object) {
                self.ingest_request(item, request, graph);
            }
        }
    }

    fn ingest_request(
        &self,
        item: &Map<String, Value>,
        request: &Map<String, Value>,
        graph: &mut EntityGraph,
    ) {
        let Some(hint) = request.get("url").and_then(entity_from_url) else {
            let request_name = item
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>");
            tracing::warn!(request = request_name, "no usable path segment, skipping request");
            return;
        };

        let revisit = graph.contains(&canonical_entity_name(&hint));

        // Response first so its fields win the first-writer-wins merge.
        if let Some(response) = first_response_object(item) {
            self.extractor.extract_object(&hint, &response, None, 0, graph);
        }

        // The body only contributes on first contact with the entity.
        if !revisit {
            if let Some(body) = request_body_object(request) {
                self.extractor.extract_object(&hint, &body, None, 0, graph);
            }
        }
    }
}

/// Derive a candidate entity name from a request URL.
///
/// Accepts both the string form and the object form (`path` array or `raw`).
fn entity_from_url(url: &Value) -> Option<String> {
    match url {
        Value::String(raw) => request_entity_segment(path_segments(raw)),
        Value::Object(obj) => {
            if let Some(path) = obj.get("path").and_then(Value::as_array) {
                request_entity_segment(path.iter().filter_map(Value::as_str))
            } else {
                let raw = obj.get("raw").and_then(Value::as_str)?;
                request_entity_segment(path_segments(raw))
            }
        }
        _ => None,
    }
}

/// Split a raw URL into path segments, dropping scheme, host, and query.
fn path_segments(raw: &str) -> impl Iterator<Item = &str> {
    let without_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let path = without_scheme.split_once('/').map_or("", |(_, path)| path);
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.split('/')
}

/// Decode the first recorded response body, unwrapping a `data` envelope or
/// taking the first element of a list body.
fn first_response_object(item: &Map<String, Value>) -> Option<Map<String, Value>> {
    let body = item
        .get("response")?
        .as_array()?
        .first()?
        .get("body")?
        .as_str()?;
    let decoded: Value = serde_json::from_str(body).ok()?;
    unwrap_record(decoded)
}

fn unwrap_record(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(mut obj) => {
            if let Some(data) = obj.remove("data") {
                return unwrap_record(data);
            }
            Some(obj)
        }
        Value::Array(items) => items.into_iter().find_map(unwrap_record),
        _ => None,
    }
}

/// Decode the request body for the supported modes.
fn request_body_object(request: &Map<String, Value>) -> Option<Map<String, Value>> {
    let body = request.get("body")?.as_object()?;
    match body.get("mode").and_then(Value::as_str)? {
        "raw" => {
            let raw = body.get("raw")?.as_str()?;
            let decoded: Value = serde_json::from_str(raw).ok()?;
            unwrap_record(decoded)
        }
        "urlencoded" => form_fields(body.get("urlencoded")?, false),
        "formdata" => form_fields(body.get("formdata")?, true),
        _ => None,
    }
}

/// Collect key/value form entries into a record; file-type entries are
/// skipped when `skip_files` is set.
fn form_fields(entries: &Value, skip_files: bool) -> Option<Map<String, Value>> {
    let mut record = Map::new();
    for entry in entries.as_array()? {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        if skip_files && entry.get("type").and_then(Value::as_str) == Some("file") {
            continue;
        }
        let Some(key) = entry.get("key").and_then(Value::as_str) else {
            continue;
        };
        let value = entry.get("value").cloned().unwrap_or(Value::Null);
        record.insert(key.to_string(), value);
    }
    if record.is_empty() { None } else { Some(record) }
}
