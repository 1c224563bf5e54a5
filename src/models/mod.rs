//! Models module
//!
//! Defines the entity-graph data contract produced by the importers and
//! consumed by downstream code generators.

pub mod entity;
pub mod field;
pub mod graph;
pub mod relationship;

pub use entity::{Entity, canonical_entity_name};
pub use field::Field;
pub use graph::EntityGraph;
pub use relationship::{Relation, RelationKind};
