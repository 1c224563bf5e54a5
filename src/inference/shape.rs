//! Value shape classification
//!
//! Reifies the duck-typed "is this array object-like" checks into a closed
//! set of shapes computed once per field, so the relationship detector can
//! branch on an explicit variant instead of re-probing the raw value.

use serde::Serialize;
use serde_json::Value;

/// The structural shape of a JSON value, as seen by the relationship detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueShape {
    /// A scalar value (null, boolean, number, or string)
    Scalar,
    /// A sequential array whose elements are not objects (includes empty arrays)
    ScalarList,
    /// A sequential array whose first element is an object
    ObjectList,
    /// A keyed object
    Object,
}

impl ValueShape {
    /// Classify a JSON value.
    ///
    /// An empty array is a [`ValueShape::ScalarList`]: a single sample can
    /// never witness a to-many relationship without at least one element.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueShape::Object,
            Value::Array(items) => match items.first() {
                Some(Value::Object(_)) => ValueShape::ObjectList,
                _ => ValueShape::ScalarList,
            },
            _ => ValueShape::Scalar,
        }
    }
}
