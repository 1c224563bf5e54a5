//! Entity graph model

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::entity::{Entity, canonical_entity_name};

/// The complete collection of entities produced by one parse invocation.
///
/// Entities are keyed by their unique canonical name and kept in insertion
/// order. Serializes as a mapping from entity name to entity record, which is
/// the contract consumed by downstream generators.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    entities: Vec<Entity>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    /// Get or create the entity a reference word resolves to, returning its
    /// canonical name. The parent hint is recorded only on first discovery.
    pub fn ensure(&mut self, reference: &str, parent: Option<&str>) -> String {
        let name = canonical_entity_name(reference);
        if !self.contains(&name) {
            tracing::debug!(entity = %name, "registering entity");
            self.entities.push(Entity::new(reference).with_parent(parent));
        }
        name
    }

    /// Register an entity, merging first-writer-wins into an existing one
    /// with the same name instead of overwriting it.
    pub fn register(&mut self, entity: Entity) {
        match self.get_mut(&entity.name) {
            Some(existing) => {
                tracing::debug!(entity = %entity.name, "merging duplicate entity observation");
                existing.merge(entity);
            }
            None => self.entities.push(entity),
        }
    }
}

impl Serialize for EntityGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entities.len()))?;
        for entity in &self.entities {
            map.serialize_entry(&entity.name, entity)?;
        }
        map.end()
    }
}

impl IntoIterator for EntityGraph {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}
