//! Entity inference engine
//!
//! The algorithmic core shared by every importer:
//!
//! - **Type inference** - map sampled values to language, storage, and cast
//!   descriptors, with field-name-sensitive overrides
//! - **Pattern detection** - recognize date, date-time, email, and UUID
//!   string shapes
//! - **Shape classification** - reduce raw values to a closed set of
//!   structural shapes
//! - **Relationship detection** - classify nested structures as to-many or
//!   to-one links and derive canonical foreign-key names

mod config;
mod error;
mod formats;
mod relations;
mod shape;
mod types;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::{InferenceError, SourceKind};
pub use formats::{StringPattern, detect_pattern};
pub use relations::{
    DEFAULT_PRIMARY_KEY, FALLBACK_FOREIGN_KEY, FieldRole, classify_field, detect_relations,
    foreign_key_name, related_entity_name,
};
pub use shape::ValueShape;
pub use types::{
    AUTHOR_LINK_FIELDS, Cast, LONG_TEXT_FIELDS, LanguageType, StorageSpec, StorageType,
    TEXT_LENGTH_THRESHOLD, infer_cast, infer_language_type, infer_storage_type, is_key_field,
};
