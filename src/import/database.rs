//! Database-schema importer
//!
//! Walks the tables exposed by a [`SchemaSource`], maps native column types to
//! the storage type system, and derives belongs-to / has-many relationship
//! pairs from `*_id` column naming. Framework bookkeeping tables (migrations,
//! cache, queue, auth tokens) are excluded from ingestion.

use crate::inference::{
    Cast, InferenceError, LanguageType, StorageSpec, StorageType, is_key_field,
};
use crate::models::{Entity, EntityGraph, Field, Relation, canonical_entity_name};
use crate::naming::{pluralize, to_camel_case, to_snake_case};

/// Column metadata as reported by a schema backend.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub native_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// Index metadata as reported by a schema backend.
#[derive(Debug, Clone)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Abstraction over a live database connection or an offline schema dump.
pub trait SchemaSource {
    fn table_names(&self) -> Result<Vec<String>, InferenceError>;
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, InferenceError>;
    fn indexes(&self, _table: &str) -> Result<Vec<IndexInfo>, InferenceError> {
        Ok(Vec::new())
    }
}

/// Which tables to ingest from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelection {
    All,
    Explicit(Vec<String>),
}

impl TableSelection {
    /// Parse a user-facing selection string: `*` for everything, otherwise a
    /// comma-separated list of table names.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Self::All;
        }
        Self::Explicit(
            trimmed
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

/// Framework bookkeeping tables that never model domain entities.
const EXCLUDED_TABLES: &[&str] = &[
    "migrations",
    "sessions",
    "cache",
    "cache_locks",
    "jobs",
    "job_batches",
    "failed_jobs",
    "password_reset_tokens",
    "personal_access_tokens",
];

/// Database-schema importer
#[derive(Debug, Default)]
pub struct DatabaseImporter;

impl DatabaseImporter {
    pub fn new() -> Self {
        Self
    }

    /// Ingest the selected tables from `source` into an entity graph.
    pub fn import(
        &self,
        source: &dyn SchemaSource,
        selection: &TableSelection,
    ) -> Result<EntityGraph, InferenceError> {
        let available = source.table_names()?;

        let tables: Vec<String> = match selection {
            TableSelection::All => available
                .iter()
                .filter(|name| !EXCLUDED_TABLES.contains(&name.as_str()))
                .cloned()
                .collect(),
            TableSelection::Explicit(names) => {
                for name in names {
                    if !available.contains(name) {
                        return Err(InferenceError::not_found(format!("table '{}'", name)));
                    }
                }
                names.clone()
            }
        };

        let mut graph = EntityGraph::new();
        let mut primary_keys = Vec::with_capacity(tables.len());

        for table in &tables {
            let columns = source.columns(table)?;
            let indexes = source.indexes(table)?;
            let primary_key = primary_key_column(&indexes);

            let mut entity = Entity::new(table);
            entity.table = table.clone();
            for column in &columns {
                entity.push_field(field_from_column(column));
            }
            tracing::debug!(table = %table, entity = %entity.name, fields = entity.fields.len(), "ingested table");
            graph.register(entity);
            primary_keys.push((canonical_entity_name(table), primary_key));
        }

        self.link_foreign_keys(&mut graph, &primary_keys);
        Ok(graph)
    }

    /// Second pass: every `*_id` column becomes a belongs-to on its table and,
    /// when the referenced table was ingested too, a reciprocal has-many.
    fn link_foreign_keys(&self, graph: &mut EntityGraph, primary_keys: &[(String, String)]) {
        let names: Vec<String> = graph.names().into_iter().map(str::to_string).collect();

        for owner_name in &names {
            let fk_columns: Vec<String> = graph
                .get(owner_name)
                .map(|entity| {
                    entity
                        .fields
                        .iter()
                        .filter(|f| f.name.ends_with("_id") && f.name != "id")
                        .map(|f| f.name.clone())
                        .collect()
                })
                .unwrap_or_default();

            for fk in fk_columns {
                let stem = fk.trim_end_matches("_id");
                let related = canonical_entity_name(stem);
                let related_key = primary_keys
                    .iter()
                    .find(|(name, _)| *name == related)
                    .map(|(_, key)| key.as_str())
                    .unwrap_or("id");

                if let Some(owner) = graph.get_mut(owner_name) {
                    owner.push_relation(
                        Relation::to_one(&related, to_camel_case(stem), &fk)
                            .with_owner_key(related_key),
                    );
                }
                if let Some(target) = graph.get_mut(&related) {
                    let owner_table = to_snake_case(owner_name);
                    target.push_relation(Relation::to_many(
                        owner_name,
                        to_camel_case(&pluralize(&owner_table)),
                        &fk,
                    ));
                }
            }
        }
    }
}

/// Primary key column name: the `PRIMARY` index if present, else the first
/// single-column unique index, else `id`.
fn primary_key_column(indexes: &[IndexInfo]) -> String {
    if let Some(primary) = indexes
        .iter()
        .find(|idx| idx.name.eq_ignore_ascii_case("primary") && idx.columns.len() == 1)
    {
        return primary.columns[0].clone();
    }
    if let Some(unique) = indexes
        .iter()
        .find(|idx| idx.unique && idx.columns.len() == 1)
    {
        return unique.columns[0].clone();
    }
    "id".to_string()
}

fn field_from_column(column: &ColumnInfo) -> Field {
    let (spec, cast) = map_native_type(&column.native_type, &column.name);
    Field::new(&column.name, column_language_type(spec.storage), spec.storage)
        .with_nullable(column.nullable || spec.nullable)
        .with_cast(cast)
}

fn column_language_type(storage: StorageType) -> LanguageType {
    match storage {
        StorageType::Integer
        | StorageType::BigInteger
        | StorageType::SmallInteger
        | StorageType::TinyInteger
        | StorageType::ForeignId => LanguageType::Integer,
        StorageType::Decimal { .. } | StorageType::Float | StorageType::Double => {
            LanguageType::Float
        }
        StorageType::Boolean => LanguageType::Boolean,
        StorageType::Json => LanguageType::Array,
        _ => LanguageType::String,
    }
}

/// Map a native column type (any common SQL dialect spelling) to a storage
/// spec and an optional application-level cast.
fn map_native_type(native: &str, column_name: &str) -> (StorageSpec, Option<Cast>) {
    let lowered = native.to_ascii_lowercase();
    let base = lowered.split(['(', ' ']).next().unwrap_or("").to_string();

    match base.as_str() {
        // Key columns carry no cast; their identity semantics live in the
        // storage type alone.
        "bigint" | "bigserial" => {
            if is_key_field(column_name) {
                (StorageSpec::new(StorageType::ForeignId), None)
            } else {
                (StorageSpec::new(StorageType::BigInteger), Some(Cast::Integer))
            }
        }
        "int" | "integer" | "serial" | "mediumint" => {
            if is_key_field(column_name) {
                (StorageSpec::new(StorageType::ForeignId), None)
            } else {
                (StorageSpec::new(StorageType::Integer), Some(Cast::Integer))
            }
        }
        "smallint" => (StorageSpec::new(StorageType::SmallInteger), Some(Cast::Integer)),
        "tinyint" => {
            // tinyint(1) is the conventional MySQL boolean column.
            if lowered.starts_with("tinyint(1)") {
                (StorageSpec::new(StorageType::Boolean), Some(Cast::Boolean))
            } else {
                (StorageSpec::new(StorageType::TinyInteger), Some(Cast::Integer))
            }
        }
        "decimal" | "numeric" => {
            let (precision, scale) = decimal_parameters(&lowered).unwrap_or((10, 2));
            (
                StorageSpec::new(StorageType::Decimal { precision, scale }),
                Some(Cast::Float),
            )
        }
        "float" | "real" => (StorageSpec::new(StorageType::Float), Some(Cast::Float)),
        "double" => (StorageSpec::new(StorageType::Double), Some(Cast::Float)),
        "bool" | "boolean" => (StorageSpec::new(StorageType::Boolean), Some(Cast::Boolean)),
        "date" => (StorageSpec::new(StorageType::Date), Some(Cast::Date)),
        "datetime" | "timestamp" | "timestamptz" => (
            StorageSpec::new(StorageType::Timestamp),
            Some(Cast::Datetime),
        ),
        "time" => (StorageSpec::new(StorageType::Time), None),
        "text" | "longtext" | "mediumtext" | "tinytext" => {
            (StorageSpec::new(StorageType::Text), None)
        }
        "json" | "jsonb" => (StorageSpec::new(StorageType::Json), Some(Cast::Array)),
        "uuid" => (StorageSpec::new(StorageType::Uuid), None),
        "blob" | "longblob" | "mediumblob" | "binary" | "varbinary" | "bytea" => {
            (StorageSpec::new(StorageType::Binary), None)
        }
        _ => (StorageSpec::new(StorageType::String), None),
    }
}

/// Parse `(precision, scale)` out of a spelling like `decimal(8,2)`.
fn decimal_parameters(lowered: &str) -> Option<(u8, u8)> {
    let inner = lowered.split_once('(')?.1.split_once(')')?.0;
    let (precision, scale) = inner.split_once(',')?;
    Some((
        precision.trim().parse().ok()?,
        scale.trim().parse().ok()?,
    ))
}
