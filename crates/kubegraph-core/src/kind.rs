//! Resource kinds.
//!
//! Only four kinds carry resolution rules. Everything else is kept as an
//! opaque node so it can still be the target of a reference.

use serde::{Serialize, Serializer};
use std::fmt;

/// Kind given to nodes synthesized for references that resolve to nothing.
pub const UNKNOWN_SERVICE: &str = "UnknownService";

/// The kind of a resource node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Routing rule pointing at services by name.
    Ingress,

    /// Selects workload controllers by label.
    Service,

    /// Deployment-style workload controller.
    Deployment,

    /// Daemon-style workload controller.
    DaemonSet,

    /// Placeholder for a referenced service that was not loaded.
    UnknownService,

    /// Any other kind. Never resolved, only referenced.
    Other(String),
}

impl ResourceKind {
    /// Maps the `kind` field of a manifest to a variant.
    ///
    /// Loaded documents never map to `UnknownService`; that variant is only
    /// given to synthesized placeholders.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "Ingress" => Self::Ingress,
            "Service" => Self::Service,
            "Deployment" => Self::Deployment,
            "DaemonSet" => Self::DaemonSet,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ingress => "Ingress",
            Self::Service => "Service",
            Self::Deployment => "Deployment",
            Self::DaemonSet => "DaemonSet",
            Self::UnknownService => UNKNOWN_SERVICE,
            Self::Other(kind) => kind,
        }
    }

    /// Workload controllers are the candidates a service selector is matched against.
    pub fn is_workload(&self) -> bool {
        matches!(self, Self::Deployment | Self::DaemonSet)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::UnknownService)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Builds the internal lookup key for a resource: `kind/name`.
pub fn resource_key(kind: &str, name: &str) -> String {
    format!("{}/{}", kind, name)
}
