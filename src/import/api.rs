//! Live-API importer
//!
//! Fetches a JSON payload from an HTTP endpoint (with optional bearer auth)
//! and runs it through the JSON-sample extraction, using the last meaningful
//! URL path segment as the root entity hint.

use std::time::Duration;

use serde_json::Value;

use super::json_sample::JSONSampleImporter;
use super::resource_segments;
use crate::inference::{InferenceConfig, InferenceError, SourceKind};
use crate::models::EntityGraph;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Live-API importer
#[derive(Debug, Default)]
pub struct APIImporter {
    extractor: JSONSampleImporter,
}

impl APIImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            extractor: JSONSampleImporter::with_config(config),
        }
    }

    /// Fetch `url` and infer an entity graph from its JSON response.
    pub fn fetch(&self, url: &str, token: Option<&str>) -> Result<EntityGraph, InferenceError> {
        let network_err = |detail: String| InferenceError::Network {
            url: url.to_string(),
            status: None,
            detail,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| network_err(e.to_string()))?;

        let mut request = client.get(url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| network_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Network {
                url: url.to_string(),
                status: Some(status.as_u16()),
                detail: format!("endpoint returned {}", status),
            });
        }

        let payload: Value = response
            .json()
            .map_err(|e| InferenceError::malformed(SourceKind::Api, e.to_string()))?;

        tracing::debug!(url = %url, "fetched API payload");
        self.extractor
            .parse_value(&payload, root_hint(url).as_deref())
    }
}

/// Last resource-naming path segment of the endpoint URL, used as the root
/// entity hint (`/api/v1/users/1` hints `users`, `/users/1/comments` hints
/// `comments`).
fn root_hint(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme.split_once('/').map_or("", |(_, path)| path);
    let path = path.split(['?', '#']).next().unwrap_or("");
    resource_segments(path.split('/'))
        .filter(|segment| !segment.chars().all(|c| c.is_ascii_digit()))
        .last()
        .map(str::to_string)
}
