//! Kubegraph Graph - dependency graph of Kubernetes manifests
//!
//! This crate turns loaded manifests into a directed graph of inferred
//! relationships:
//! - an Ingress routes to the Services named in its backends
//! - a Service selects the Deployments and DaemonSets whose labels match
//! - a Deployment or DaemonSet references the Services listed in its
//!   `kube.references.services` annotation
//!
//! References to services that are not part of the input become
//! `UnknownService` placeholder nodes.
//!
//! # Example
//!
//! ```no_run
//! use kubegraph_graph::build_graph;
//!
//! let graph = build_graph("deploy/")?;
//! for entity in graph.entities() {
//!     println!("{} {} ({})", entity.id, entity.name, entity.kind);
//! }
//! for (from, to) in graph.references() {
//!     println!("{} -> {}", from, to);
//! }
//! # Ok::<(), kubegraph_graph::ManifestError>(())
//! ```

mod builder;
mod edge;
mod graph;
mod registry;

pub use builder::GraphBuilder;
pub use edge::{EdgeKind, GraphEdge, Reference};
pub use graph::{Entity, GraphExport, GraphStats, ManifestGraph, NodeId};
pub use kubegraph_core::{BuildConfig, DuplicatePolicy, ManifestError, Result};

use kubegraph_core::ManifestLoader;
use std::path::Path;

/// Builds the graph for every manifest under `root` with default settings.
///
/// Each call re-reads the tree from scratch; nothing is cached between calls.
pub fn build_graph(root: impl AsRef<Path>) -> Result<ManifestGraph> {
    build_graph_with(root, &BuildConfig::default())
}

pub fn build_graph_with(root: impl AsRef<Path>, config: &BuildConfig) -> Result<ManifestGraph> {
    let manifests = ManifestLoader::new(config).load(root.as_ref())?;

    let mut builder = GraphBuilder::new(config.clone());
    builder.add_manifests(manifests)?;
    builder.build()
}
