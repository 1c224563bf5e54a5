//! Graph assembly
//!
//! Merges entities collected from any number of importer runs into a single
//! graph whose entities are ordered parent-before-child, so downstream
//! consumers (migration writers, code generators) can process them in one
//! pass. A cycle in the parent chain is reported as a distinct error with
//! the offending entity names.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::inference::InferenceError;
use crate::models::{Entity, EntityGraph};

/// Merges and dependency-orders inferred entities.
#[derive(Debug, Default)]
pub struct GraphAssembler;

impl GraphAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble entities into a parent-before-child ordered graph.
    ///
    /// Entities sharing a canonical name are merged first (earlier fields and
    /// relations win). Entities whose parent was never collected are treated
    /// as roots.
    pub fn assemble(&self, entities: Vec<Entity>) -> Result<EntityGraph, InferenceError> {
        let mut merged = EntityGraph::new();
        for entity in entities {
            merged.register(entity);
        }

        let mut remaining = merged.into_entities();
        let mut ordered = EntityGraph::new();

        while !remaining.is_empty() {
            let placeable: Vec<usize> = remaining
                .iter()
                .enumerate()
                .filter(|(_, entity)| match entity.parent.as_deref() {
                    None => true,
                    Some(parent) => {
                        ordered.contains(parent)
                            || !remaining.iter().any(|other| other.name == parent)
                    }
                })
                .map(|(idx, _)| idx)
                .collect();

            if placeable.is_empty() {
                return Err(InferenceError::DependencyCycle {
                    entities: cycle_members(&remaining),
                });
            }

            // Reverse so swap_remove indices stay valid.
            for idx in placeable.into_iter().rev() {
                ordered.register(remaining.swap_remove(idx));
            }
            remaining.sort_by(|a, b| a.name.cmp(&b.name));
        }

        tracing::debug!(entities = ordered.len(), "assembled entity graph");
        Ok(ordered)
    }
}

/// Names of the entities on a cycle in the parent chain, in traversal order.
fn cycle_members(remaining: &[Entity]) -> Vec<String> {
    let mut graph = DiGraph::<&str, ()>::new();
    let mut nodes = HashMap::new();
    for entity in remaining {
        nodes.insert(entity.name.as_str(), graph.add_node(entity.name.as_str()));
    }
    for entity in remaining {
        if let Some(parent) = entity.parent.as_deref() {
            if let (Some(&from), Some(&to)) = (nodes.get(parent), nodes.get(entity.name.as_str())) {
                graph.add_edge(from, to, ());
            }
        }
    }

    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            return component.into_iter().map(|n| graph[n].to_string()).collect();
        }
    }
    // Self-referential parent or no detectable component: report everything
    // still unplaced.
    remaining.iter().map(|e| e.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, parent: Option<&str>) -> Entity {
        Entity::new(name).with_parent(parent)
    }

    #[test]
    fn test_parents_come_before_children() {
        let assembler = GraphAssembler::new();
        let graph = assembler
            .assemble(vec![
                entity("Comment", Some("Post")),
                entity("Post", Some("User")),
                entity("User", None),
            ])
            .unwrap();

        let order: Vec<&str> = graph.iter().map(|e| e.name.as_str()).collect();
        let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(pos("User") < pos("Post"));
        assert!(pos("Post") < pos("Comment"));
    }

    #[test]
    fn test_unknown_parent_is_treated_as_root() {
        let assembler = GraphAssembler::new();
        let graph = assembler
            .assemble(vec![entity("Orphan", Some("Missing"))])
            .unwrap();
        assert_eq!(graph.len(), 1);
        assert!(graph.contains("Orphan"));
    }

    #[test]
    fn test_duplicate_entities_are_merged() {
        let mut first = Entity::new("User");
        first.push_field(crate::models::Field::inferred(
            "name",
            &serde_json::json!("Ada"),
            false,
        ));
        let mut second = Entity::new("User");
        second.push_field(crate::models::Field::inferred(
            "email",
            &serde_json::json!("ada@x.com"),
            false,
        ));

        let graph = GraphAssembler::new()
            .assemble(vec![first, second])
            .unwrap();
        assert_eq!(graph.len(), 1);
        let user = graph.get("User").unwrap();
        assert!(user.has_field("name"));
        assert!(user.has_field("email"));
    }

    #[test]
    fn test_parent_cycle_is_reported() {
        let assembler = GraphAssembler::new();
        let err = assembler
            .assemble(vec![
                entity("A", Some("B")),
                entity("B", Some("A")),
                entity("C", None),
            ])
            .unwrap_err();

        match err {
            InferenceError::DependencyCycle { entities } => {
                assert_eq!(entities.len(), 2);
                assert!(entities.contains(&"A".to_string()));
                assert!(entities.contains(&"B".to_string()));
            }
            other => panic!("expected dependency cycle, got {other:?}"),
        }
    }
}
