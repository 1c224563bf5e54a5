//! Relationship model

use serde::{Deserialize, Serialize};

use crate::inference::DEFAULT_PRIMARY_KEY;

/// The direction-specific part of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelationKind {
    /// One-to-many: the foreign key lives on the related entity.
    #[serde(rename_all = "camelCase")]
    ToMany { local_key: String },
    /// Many-to-one: the foreign key lives on the owning entity.
    #[serde(rename_all = "camelCase")]
    ToOne { owner_key: String },
}

/// A detected structural link between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(flatten)]
    pub kind: RelationKind,
    /// Name of the entity on the other side
    pub related_entity: String,
    /// camelCase accessor name for generated model code
    pub accessor: String,
    /// Foreign-key column name
    pub foreign_key: String,
}

impl Relation {
    pub fn to_many(related_entity: impl Into<String>, accessor: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::ToMany {
                local_key: DEFAULT_PRIMARY_KEY.to_string(),
            },
            related_entity: related_entity.into(),
            accessor: accessor.into(),
            foreign_key: foreign_key.into(),
        }
    }

    pub fn to_one(related_entity: impl Into<String>, accessor: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::ToOne {
                owner_key: DEFAULT_PRIMARY_KEY.to_string(),
            },
            related_entity: related_entity.into(),
            accessor: accessor.into(),
            foreign_key: foreign_key.into(),
        }
    }

    pub fn with_local_key(mut self, key: impl Into<String>) -> Self {
        if let RelationKind::ToMany { local_key } = &mut self.kind {
            *local_key = key.into();
        }
        self
    }

    pub fn with_owner_key(mut self, key: impl Into<String>) -> Self {
        if let RelationKind::ToOne { owner_key } = &mut self.kind {
            *owner_key = key.into();
        }
        self
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self.kind, RelationKind::ToMany { .. })
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self.kind, RelationKind::ToOne { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let rel = Relation::to_many("Post", "posts", "user_id");
        assert!(rel.is_to_many());
        assert_eq!(rel.kind, RelationKind::ToMany { local_key: "id".to_string() });

        let rel = Relation::to_one("User", "user", "user_id").with_owner_key("uuid");
        assert!(rel.is_to_one());
        assert_eq!(rel.kind, RelationKind::ToOne { owner_key: "uuid".to_string() });
    }

    #[test]
    fn test_serialization_is_flat() {
        let rel = Relation::to_many("Post", "posts", "user_id");
        let value = serde_json::to_value(&rel).unwrap();
        assert_eq!(value["type"], "toMany");
        assert_eq!(value["localKey"], "id");
        assert_eq!(value["relatedEntity"], "Post");
        assert_eq!(value["accessor"], "posts");
        assert_eq!(value["foreignKey"], "user_id");
    }
}
