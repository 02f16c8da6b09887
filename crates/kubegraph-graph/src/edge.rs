//! Edge types for the manifest graph.
//!
//! The graph is directed: an edge points from the resource that declares the
//! dependency to the resource it depends on.

use serde::{Deserialize, Serialize};

/// A reference between two resources, as `(from_id, to_id)`.
pub type Reference = (usize, usize);

/// Why one resource points at another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// An ingress routes traffic to a service backend.
    Routes,

    /// A service selects a workload controller by label.
    Selects,

    /// A controller names a service in its reference annotation.
    References,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Routes => "routes",
            Self::Selects => "selects",
            Self::References => "references",
        };
        write!(f, "{}", s)
    }
}

/// A flattened edge for export and visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}
