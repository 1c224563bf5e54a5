//! Field model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inference::{
    Cast, LanguageType, StorageType, infer_cast, infer_language_type, infer_storage_type,
};

/// A scalar- or json-typed attribute of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name in lower_snake_case
    pub name: String,
    /// Witness value used only for display/test-data purposes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<Value>,
    /// Language-level type
    pub language_type: LanguageType,
    /// Storage/column type
    pub storage_type: StorageType,
    /// Whether the column allows NULL values
    pub nullable: bool,
    /// Display/transform cast, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Cast>,
}

impl Field {
    pub fn new(name: impl Into<String>, language_type: LanguageType, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            sample_value: None,
            language_type,
            storage_type,
            nullable: false,
            cast: None,
        }
    }

    /// Build a field by running the type inferrer over a sampled value.
    pub fn inferred(name: &str, value: &Value, collect_sample: bool) -> Self {
        let spec = infer_storage_type(value, name);
        Self {
            name: name.to_string(),
            sample_value: if collect_sample && !value.is_null() {
                Some(value.clone())
            } else {
                None
            },
            language_type: infer_language_type(value),
            storage_type: spec.storage,
            nullable: spec.nullable,
            cast: infer_cast(value, name),
        }
    }

    /// Build an unsigned big-integer foreign-key column.
    pub fn foreign_key(name: &str) -> Self {
        Self::new(name, LanguageType::Integer, StorageType::ForeignId)
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_cast(mut self, cast: Option<Cast>) -> Self {
        self.cast = cast;
        self
    }
}
