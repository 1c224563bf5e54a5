//! Configuration for entity inference

use serde::{Deserialize, Serialize};

/// Configuration shared by the sample-driven importers.
///
/// The nested-JSON recursion ceiling is deliberately not configurable; see
/// [`crate::import::json_sample::MAX_DEPTH`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Entity name used when a document root is itself a record and no hint
    /// is available.
    pub root_entity_name: String,

    /// Record witness sample values on inferred fields (display/test-data
    /// purposes only; never consulted for schema decisions).
    pub collect_samples: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            root_entity_name: "Record".to_string(),
            collect_samples: true,
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for [`InferenceConfig`]
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the fallback entity name for record-shaped document roots.
    pub fn root_entity_name(mut self, name: impl Into<String>) -> Self {
        self.config.root_entity_name = name.into();
        self
    }

    /// Enable or disable witness sample collection.
    pub fn collect_samples(mut self, collect: bool) -> Self {
        self.config.collect_samples = collect;
        self
    }

    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
