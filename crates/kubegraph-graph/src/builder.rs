//! Graph builder for constructing the manifest graph from loaded resources.
//!
//! The builder runs in strict phases:
//! 1. Add every loaded manifest as a node and index it by `kind/name`
//! 2. Derive each manifest's typed view once
//! 3. Visit nodes in id order and apply the rule for their kind
//!
//! References to services that were not loaded get an `UnknownService`
//! placeholder, created on the first miss and reused afterwards.

use crate::edge::EdgeKind;
use crate::graph::{Entity, ManifestGraph, NodeId};
use crate::registry::Registry;
use kubegraph_core::views::{split_references, IngressView, ServiceView, WorkloadView};
use kubegraph_core::{
    resource_key, BuildConfig, Manifest, ResourceKind, Result, TypedResource,
};
use petgraph::graph::DiGraph;
use tracing::{debug, info, warn};

/// Builds a `ManifestGraph` from loaded manifests.
pub struct GraphBuilder {
    graph: DiGraph<Entity, EdgeKind>,
    registry: Registry,
    /// Loaded resources with the node each was added as. Placeholders have
    /// no body and never appear here.
    manifests: Vec<(NodeId, Manifest)>,
    config: BuildConfig,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            graph: DiGraph::new(),
            registry: Registry::new(config.duplicates),
            manifests: Vec::new(),
            config,
        }
    }

    /// Adds loaded manifests as nodes.
    ///
    /// Call this before `build`; ids are assigned in the order manifests
    /// arrive.
    pub fn add_manifests(&mut self, manifests: Vec<Manifest>) -> Result<()> {
        for manifest in manifests {
            let entity = Entity {
                id: self.graph.node_count(),
                kind: manifest.kind.clone(),
                name: manifest.name.clone(),
            };
            let id = self.graph.add_node(entity);
            self.registry.insert(manifest.key(), id)?;
            self.manifests.push((id, manifest));
        }
        Ok(())
    }

    /// Resolves every loaded manifest into edges.
    ///
    /// Any typed view that cannot be derived aborts the build.
    fn resolve_edges(&mut self) -> Result<()> {
        let typed = self
            .manifests
            .iter()
            .map(|(id, manifest)| Ok((*id, TypedResource::from_manifest(manifest)?)))
            .collect::<Result<Vec<_>>>()?;

        let workloads: Vec<(NodeId, &WorkloadView)> = typed
            .iter()
            .filter_map(|(id, resource)| resource.as_workload().map(|view| (*id, view)))
            .collect();

        for (from, resource) in &typed {
            let from = *from;
            match resource {
                TypedResource::Ingress(view) => self.resolve_ingress(from, view),
                TypedResource::Service(view) => self.resolve_service(from, view, &workloads),
                TypedResource::Workload(view) => self.resolve_workload(from, view),
                TypedResource::Opaque => {}
            }
        }

        Ok(())
    }

    fn resolve_ingress(&mut self, from: NodeId, view: &IngressView) {
        for name in view.backend_services() {
            let to = self.service_or_placeholder(name);
            self.link(from, to, EdgeKind::Routes);
        }
    }

    fn resolve_service(
        &mut self,
        from: NodeId,
        view: &ServiceView,
        workloads: &[(NodeId, &WorkloadView)],
    ) {
        for (candidate, workload) in workloads {
            if workload.is_selected_by(view) {
                self.link(from, *candidate, EdgeKind::Selects);
            }
        }
    }

    fn resolve_workload(&mut self, from: NodeId, view: &WorkloadView) {
        let Some(value) = view.annotation(&self.config.reference_annotation) else {
            return;
        };

        if value.split(',').any(|segment| segment.trim().is_empty()) {
            warn!(
                "Skipping empty entries in {} on {}",
                self.config.reference_annotation,
                self.describe(from)
            );
        }

        for name in split_references(value) {
            let to = self.service_or_placeholder(name);
            self.link(from, to, EdgeKind::References);
        }
    }

    /// Looks up `Service/<name>`, synthesizing a placeholder on a miss.
    fn service_or_placeholder(&mut self, name: &str) -> NodeId {
        let key = resource_key(ResourceKind::Service.as_str(), name);
        if let Some(id) = self.registry.resolve(&key) {
            return id;
        }

        let placeholder = Entity {
            id: self.graph.node_count(),
            kind: ResourceKind::UnknownService,
            name: name.to_string(),
        };
        let id = self.graph.add_node(placeholder);
        self.registry.insert_placeholder(key, id);
        debug!("Synthesized placeholder for missing service {}", name);
        id
    }

    /// Records an edge. A repeated `(from, to)` pair is stored once.
    fn link(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        self.graph.update_edge(from, to, kind);
    }

    fn describe(&self, id: NodeId) -> String {
        self.graph
            .node_weight(id)
            .map(|e| format!("{}/{}", e.kind, e.name))
            .unwrap_or_default()
    }

    /// Resolves edges and returns the finished graph.
    pub fn build(mut self) -> Result<ManifestGraph> {
        self.resolve_edges()?;

        let graph = ManifestGraph::new(self.graph);
        let stats = graph.stats();
        info!(
            "Built graph: {} entities ({} placeholders), {} references",
            stats.entity_count, stats.placeholder_count, stats.reference_count
        );
        Ok(graph)
    }
}
