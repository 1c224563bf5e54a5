//! Importers
//!
//! Each importer turns one external source format into an [`EntityGraph`](crate::models::EntityGraph):
//! raw JSON samples, OpenAPI/Swagger documents, Postman collections,
//! database schemas, and (behind the `api-backend` feature) live JSON APIs.

#[cfg(feature = "api-backend")]
pub mod api;
pub mod database;
pub mod json_sample;
pub mod openapi;
pub mod postman;

#[cfg(feature = "api-backend")]
pub use api::APIImporter;
pub use database::{ColumnInfo, DatabaseImporter, IndexInfo, SchemaSource, TableSelection};
pub use json_sample::{JSONSampleImporter, MAX_DEPTH};
pub use openapi::OpenAPIImporter;
pub use postman::PostmanImporter;

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v\d+$").unwrap());

/// URL path segments that can name a resource, skipping empty segments,
/// the conventional `api` prefix, and version segments like `v1`.
pub(crate) fn resource_segments<'a>(
    segments: impl IntoIterator<Item = &'a str>,
) -> impl Iterator<Item = &'a str> {
    segments.into_iter().map(str::trim).filter(|segment| {
        !segment.is_empty() && *segment != "api" && !VERSION_SEGMENT.is_match(segment)
    })
}

/// First URL path segment that names a resource.
pub(crate) fn request_entity_segment<'a>(
    segments: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    resource_segments(segments).next().map(str::to_string)
}
