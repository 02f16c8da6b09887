//! The finished manifest graph.
//!
//! `ManifestGraph` wraps a petgraph `DiGraph` whose node indexes double as
//! entity ids. Nodes are never removed, so an id is simply the entity's
//! position in the ordered entity list. There are no mutation methods; a new
//! snapshot comes from building again.

use crate::edge::{EdgeKind, GraphEdge, Reference};
use kubegraph_core::ResourceKind;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// A resource node as callers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Position in the ordered entity list.
    pub id: usize,
    pub kind: ResourceKind,
    pub name: String,
}

impl Entity {
    pub fn is_placeholder(&self) -> bool {
        self.kind.is_placeholder()
    }
}

/// Immutable dependency graph of one manifest tree.
#[derive(Debug, Clone)]
pub struct ManifestGraph {
    graph: DiGraph<Entity, EdgeKind>,
}

impl ManifestGraph {
    pub(crate) fn new(graph: DiGraph<Entity, EdgeKind>) -> Self {
        Self { graph }
    }

    /// All entities in id order.
    pub fn entities(&self) -> impl ExactSizeIterator<Item = &Entity> + '_ {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// The distinct `(from, to)` pairs, ordered.
    pub fn references(&self) -> BTreeSet<Reference> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect()
    }

    /// Gets an entity by id.
    pub fn entity(&self, id: usize) -> Option<&Entity> {
        self.graph.node_weight(NodeIndex::new(id))
    }

    /// Finds an entity by kind and name.
    pub fn find(&self, kind: &ResourceKind, name: &str) -> Option<&Entity> {
        self.entities().find(|e| &e.kind == kind && e.name == name)
    }

    /// Returns the number of entities.
    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct references.
    pub fn reference_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns all edges with their kinds, sorted by endpoints.
    pub fn edges(&self) -> Vec<GraphEdge> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| GraphEdge {
                source: edge.source().index(),
                target: edge.target().index(),
                kind: *edge.weight(),
            })
            .collect();
        edges.sort_by_key(|edge| (edge.source, edge.target));
        edges
    }

    /// Entities this one depends on.
    pub fn outgoing(&self, id: usize) -> Vec<&Entity> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Entities that depend on this one.
    pub fn incoming(&self, id: usize) -> Vec<&Entity> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: usize, direction: Direction) -> Vec<&Entity> {
        if id >= self.graph.node_count() {
            return Vec::new();
        }
        let mut found: Vec<&Entity> = self
            .graph
            .neighbors_directed(NodeIndex::new(id), direction)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect();
        found.sort_by_key(|e| e.id);
        found
    }

    /// Entities synthesized for references that matched nothing loaded.
    pub fn placeholders(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities().filter(|e| e.is_placeholder())
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            entity_count: self.entity_count(),
            reference_count: self.reference_count(),
            placeholder_count: self.placeholders().count(),
        }
    }

    /// A serializable node-link snapshot.
    pub fn export(&self) -> GraphExport<'_> {
        GraphExport {
            stats: self.stats(),
            entities: self.entities().collect(),
            edges: self.edges(),
        }
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub entity_count: usize,
    pub reference_count: usize,
    pub placeholder_count: usize,
}

/// Node-link document produced by `ManifestGraph::export`.
#[derive(Debug, Serialize)]
pub struct GraphExport<'a> {
    pub stats: GraphStats,
    pub entities: Vec<&'a Entity>,
    pub edges: Vec<GraphEdge>,
}
