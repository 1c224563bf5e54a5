//! Error types for entity inference

use std::fmt;

use thiserror::Error;

/// The input shape an importer was reading when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Json,
    OpenApi,
    Postman,
    Database,
    Api,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Json => write!(f, "JSON"),
            SourceKind::OpenApi => write!(f, "OpenAPI"),
            SourceKind::Postman => write!(f, "Postman"),
            SourceKind::Database => write!(f, "database"),
            SourceKind::Api => write!(f, "API"),
        }
    }
}

/// Errors surfaced by importers and the graph assembler.
///
/// Importers fail fast: a failed parse yields no entity graph at all.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// The raw input could not be decoded into the importer's envelope.
    #[error("malformed {kind} input: {detail}")]
    MalformedInput { kind: SourceKind, detail: String },

    /// A referenced named resource (table, schema) does not exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The input decoded but is not a dialect this importer supports.
    #[error("unsupported format: {detail}")]
    UnsupportedFormat { detail: String },

    /// The live-API fetch failed or returned a non-success status.
    #[error("network error fetching {url}: {detail}")]
    Network {
        url: String,
        status: Option<u16>,
        detail: String,
    },

    /// Parent back-references form a cycle, so no dependency order exists.
    #[error("dependency cycle between entities: {}", entities.join(" -> "))]
    DependencyCycle { entities: Vec<String> },
}

impl InferenceError {
    pub fn malformed(kind: SourceKind, detail: impl Into<String>) -> Self {
        InferenceError::MalformedInput {
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        InferenceError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        InferenceError::UnsupportedFormat {
            detail: detail.into(),
        }
    }
}
