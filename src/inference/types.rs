//! Type inference for sampled values
//!
//! Maps a raw JSON value (with an optional field-name hint) onto three
//! parallel descriptors: a language-level type, a storage/column type with
//! nullability, and an optional display cast.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::formats::{StringPattern, detect_pattern};

/// Field names that force text storage regardless of sample length.
pub const LONG_TEXT_FIELDS: &[&str] = &["body", "content", "description", "text", "bio", "summary"];

/// Field names that mark an entity as linked to an owning user.
pub const AUTHOR_LINK_FIELDS: &[&str] = &["user_id", "author_id", "owner_id", "created_by"];

/// Strings longer than this are stored as text rather than a varchar column.
pub const TEXT_LENGTH_THRESHOLD: usize = 255;

/// Language-level type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
}

/// Storage/column type of a field.
///
/// `ForeignId` is the unsigned big-integer flavor used for primary and
/// foreign key columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    String,
    Text,
    Integer,
    BigInteger,
    SmallInteger,
    TinyInteger,
    ForeignId,
    Boolean,
    Decimal { precision: u8, scale: u8 },
    Float,
    Double,
    Date,
    Timestamp,
    Time,
    Json,
    Uuid,
    Binary,
}

impl StorageType {
    /// Default decimal storage for floating point samples.
    pub fn default_decimal() -> Self {
        StorageType::Decimal {
            precision: 10,
            scale: 2,
        }
    }
}

/// Display/transform cast applied by generated model code.
///
/// Serialized as its canonical string identifier (e.g. `decimal:2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    Boolean,
    Integer,
    Float,
    Array,
    Object,
    Date,
    Datetime,
    Decimal(u8),
}

impl fmt::Display for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cast::Boolean => write!(f, "boolean"),
            Cast::Integer => write!(f, "integer"),
            Cast::Float => write!(f, "float"),
            Cast::Array => write!(f, "array"),
            Cast::Object => write!(f, "object"),
            Cast::Date => write!(f, "date"),
            Cast::Datetime => write!(f, "datetime"),
            Cast::Decimal(scale) => write!(f, "decimal:{scale}"),
        }
    }
}

impl FromStr for Cast {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Cast::Boolean),
            "integer" => Ok(Cast::Integer),
            "float" => Ok(Cast::Float),
            "array" => Ok(Cast::Array),
            "object" => Ok(Cast::Object),
            "date" => Ok(Cast::Date),
            "datetime" => Ok(Cast::Datetime),
            other => match other.strip_prefix("decimal:") {
                Some(scale) => scale
                    .parse::<u8>()
                    .map(Cast::Decimal)
                    .map_err(|_| format!("invalid decimal cast scale: {other}")),
                None => Err(format!("unknown cast identifier: {other}")),
            },
        }
    }
}

impl Serialize for Cast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cast {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Storage descriptor produced by [`infer_storage_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    pub storage: StorageType,
    pub nullable: bool,
}

impl StorageSpec {
    pub fn new(storage: StorageType) -> Self {
        Self {
            storage,
            nullable: false,
        }
    }

    pub fn nullable(storage: StorageType) -> Self {
        Self {
            storage,
            nullable: true,
        }
    }
}

/// True for `id` and any `*_id` field name.
pub fn is_key_field(field_name: &str) -> bool {
    field_name == "id" || field_name.ends_with("_id")
}

/// Infer the language-level type of a sampled value.
///
/// Null maps to string; nullability is carried on the storage descriptor.
pub fn infer_language_type(value: &Value) -> LanguageType {
    match value {
        Value::Null | Value::String(_) => LanguageType::String,
        Value::Bool(_) => LanguageType::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                LanguageType::Integer
            } else {
                LanguageType::Float
            }
        }
        Value::Array(_) => LanguageType::Array,
        Value::Object(_) => LanguageType::Object,
    }
}

/// Infer the storage type of a sampled value, with field-name-sensitive
/// overrides.
///
/// A bare null can never determine a storage type; the documented fallback
/// is a nullable string column.
pub fn infer_storage_type(value: &Value, field_name: &str) -> StorageSpec {
    match value {
        Value::Null => StorageSpec::nullable(StorageType::String),
        Value::Bool(_) => StorageSpec::new(StorageType::Boolean),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                if is_key_field(field_name) {
                    StorageSpec::new(StorageType::ForeignId)
                } else {
                    StorageSpec::new(StorageType::Integer)
                }
            } else {
                StorageSpec::new(StorageType::default_decimal())
            }
        }
        Value::Array(_) | Value::Object(_) => StorageSpec::new(StorageType::Json),
        Value::String(s) => infer_string_storage(s, field_name),
    }
}

fn infer_string_storage(sample: &str, field_name: &str) -> StorageSpec {
    let pattern = detect_pattern(sample);
    // Email is a validation signal for downstream generators, not a distinct
    // column type.
    if field_name == "email" || pattern == StringPattern::Email {
        return StorageSpec::new(StorageType::String);
    }
    match pattern {
        StringPattern::Uuid => StorageSpec::new(StorageType::Uuid),
        StringPattern::DateTime => StorageSpec::nullable(StorageType::Timestamp),
        StringPattern::Date => StorageSpec::new(StorageType::Date),
        _ => {
            if sample.len() > TEXT_LENGTH_THRESHOLD || LONG_TEXT_FIELDS.contains(&field_name) {
                StorageSpec::new(StorageType::Text)
            } else {
                StorageSpec::new(StorageType::String)
            }
        }
    }
}

/// Infer the display cast of a sampled value, if any.
pub fn infer_cast(value: &Value, field_name: &str) -> Option<Cast> {
    match value {
        Value::Bool(_) => Some(Cast::Boolean),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                if is_key_field(field_name) {
                    None
                } else {
                    Some(Cast::Integer)
                }
            } else {
                Some(Cast::Decimal(2))
            }
        }
        Value::String(s) => match detect_pattern(s) {
            StringPattern::DateTime => Some(Cast::Datetime),
            StringPattern::Date => Some(Cast::Date),
            _ => None,
        },
        Value::Array(_) => Some(Cast::Array),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_types() {
        assert_eq!(infer_language_type(&json!(null)), LanguageType::String);
        assert_eq!(infer_language_type(&json!(true)), LanguageType::Boolean);
        assert_eq!(infer_language_type(&json!(7)), LanguageType::Integer);
        assert_eq!(infer_language_type(&json!(7.5)), LanguageType::Float);
        assert_eq!(infer_language_type(&json!("x")), LanguageType::String);
        assert_eq!(infer_language_type(&json!([1])), LanguageType::Array);
        assert_eq!(infer_language_type(&json!({"a": 1})), LanguageType::Object);
    }

    #[test]
    fn test_key_fields_become_foreign_ids() {
        assert_eq!(
            infer_storage_type(&json!(1), "id").storage,
            StorageType::ForeignId
        );
        assert_eq!(
            infer_storage_type(&json!(1), "user_id").storage,
            StorageType::ForeignId
        );
        assert_eq!(
            infer_storage_type(&json!(1), "count").storage,
            StorageType::Integer
        );
    }

    #[test]
    fn test_price_becomes_decimal() {
        let spec = infer_storage_type(&json!(999.99), "price");
        assert_eq!(
            spec.storage,
            StorageType::Decimal {
                precision: 10,
                scale: 2
            }
        );
        assert!(!spec.nullable);
        assert_eq!(infer_cast(&json!(999.99), "price"), Some(Cast::Decimal(2)));
    }

    #[test]
    fn test_datetime_string() {
        let spec = infer_storage_type(&json!("2024-01-15T10:30:00Z"), "published_at");
        assert_eq!(spec.storage, StorageType::Timestamp);
        assert!(spec.nullable);
        assert_eq!(
            infer_cast(&json!("2024-01-15T10:30:00Z"), "published_at"),
            Some(Cast::Datetime)
        );
    }

    #[test]
    fn test_date_string() {
        let spec = infer_storage_type(&json!("2024-01-15"), "born_on");
        assert_eq!(spec.storage, StorageType::Date);
        assert!(!spec.nullable);
        assert_eq!(infer_cast(&json!("2024-01-15"), "born_on"), Some(Cast::Date));
    }

    #[test]
    fn test_email_stays_string() {
        let spec = infer_storage_type(&json!("john@x.com"), "email");
        assert_eq!(spec.storage, StorageType::String);
        // Even a long email-ish value stays a string column.
        let spec = infer_storage_type(&json!("someone@example.com"), "contact");
        assert_eq!(spec.storage, StorageType::String);
    }

    #[test]
    fn test_long_text() {
        let long = "x".repeat(300);
        assert_eq!(
            infer_storage_type(&json!(long), "note").storage,
            StorageType::Text
        );
        assert_eq!(
            infer_storage_type(&json!("short"), "body").storage,
            StorageType::Text
        );
        assert_eq!(
            infer_storage_type(&json!("short"), "title").storage,
            StorageType::String
        );
    }

    #[test]
    fn test_uuid_string() {
        let spec = infer_storage_type(&json!("550e8400-e29b-41d4-a716-446655440000"), "token");
        assert_eq!(spec.storage, StorageType::Uuid);
    }

    #[test]
    fn test_null_falls_back_to_nullable_string() {
        let spec = infer_storage_type(&json!(null), "nickname");
        assert_eq!(spec.storage, StorageType::String);
        assert!(spec.nullable);
        assert_eq!(infer_cast(&json!(null), "nickname"), None);
    }

    #[test]
    fn test_cast_table() {
        assert_eq!(infer_cast(&json!(true), "active"), Some(Cast::Boolean));
        assert_eq!(infer_cast(&json!(3), "views"), Some(Cast::Integer));
        assert_eq!(infer_cast(&json!(3), "id"), None);
        assert_eq!(infer_cast(&json!(3), "user_id"), None);
        assert_eq!(infer_cast(&json!([1, 2]), "tags"), Some(Cast::Array));
        assert_eq!(infer_cast(&json!("plain"), "title"), None);
    }

    #[test]
    fn test_cast_round_trips_through_string() {
        for cast in [Cast::Boolean, Cast::Datetime, Cast::Decimal(2), Cast::Array] {
            let text = cast.to_string();
            assert_eq!(text.parse::<Cast>().unwrap(), cast);
        }
        assert!("decimal:x".parse::<Cast>().is_err());
        assert!("mystery".parse::<Cast>().is_err());
    }
}
