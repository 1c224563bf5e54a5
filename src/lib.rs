//! Entity Modelling Core - Schema and relationship inference from external sources
//!
//! Provides unified interfaces for:
//! - Inferring entity definitions from raw JSON samples
//! - Importing OpenAPI/Swagger documents, Postman collections, and database schemas
//! - Fetching live JSON APIs (via the `api-backend` feature)
//! - Naming normalization (singular/plural, case conversion)
//! - Assembling merged, dependency-ordered entity graphs

pub mod assembler;
pub mod import;
pub mod inference;
pub mod models;
pub mod naming;

// Re-export commonly used types
pub use assembler::GraphAssembler;
#[cfg(feature = "api-backend")]
pub use import::APIImporter;
pub use import::{
    ColumnInfo, DatabaseImporter, IndexInfo, JSONSampleImporter, OpenAPIImporter, PostmanImporter,
    SchemaSource, TableSelection,
};
pub use inference::{
    Cast, InferenceConfig, InferenceError, LanguageType, SourceKind, StorageType,
};
pub use models::{Entity, EntityGraph, Field, Relation, RelationKind, canonical_entity_name};
