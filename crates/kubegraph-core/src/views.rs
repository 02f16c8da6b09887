//! Typed views over manifest bodies.
//!
//! Each view only declares the fields resolution needs. Unknown fields are
//! ignored, absent ones default to empty, and a field present with the wrong
//! type is a shape error.

use crate::document::Manifest;
use crate::error::Result;
use crate::kind::ResourceKind;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    #[serde(deserialize_with = "scalar_map")]
    pub labels: Option<Labels>,
    #[serde(deserialize_with = "scalar_map")]
    pub annotations: Option<Labels>,
}

/// Reads a string map whose values may be any YAML scalar.
///
/// Numbers and booleans are rendered as strings (`version: 2` reads as `"2"`),
/// null reads as an empty string. Nested mappings and sequences are
/// rejected.
fn scalar_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Labels>, D::Error> {
    let Some(raw) = Option::<BTreeMap<String, Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                other => {
                    return Err(de::Error::custom(format!(
                        "value of `{}` must be a scalar, found {:?}",
                        key, other
                    )))
                }
            };
            Ok((key, text))
        })
        .collect::<std::result::Result<Labels, D::Error>>()
        .map(Some)
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingress
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngressView {
    pub spec: Option<IngressSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngressSpec {
    pub rules: Option<Vec<IngressRule>>,
    /// `extensions/v1beta1` spelling of the catch-all backend.
    pub backend: Option<IngressBackend>,
    pub default_backend: Option<IngressBackend>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngressRule {
    pub http: Option<HttpRuleValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpRuleValue {
    pub paths: Option<Vec<HttpPath>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpPath {
    pub backend: Option<IngressBackend>,
}

/// A backend in either the legacy (`serviceName`) or the
/// `networking.k8s.io/v1` (`service.name`) form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngressBackend {
    pub service_name: Option<String>,
    pub service: Option<ServiceBackendRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceBackendRef {
    pub name: Option<String>,
}

impl IngressBackend {
    pub fn service_name(&self) -> Option<&str> {
        self.service_name
            .as_deref()
            .or_else(|| self.service.as_ref().and_then(|s| s.name.as_deref()))
    }
}

impl IngressView {
    /// Every backend service name, in document order. Repeats are kept.
    pub fn backend_services(&self) -> Vec<&str> {
        let Some(spec) = &self.spec else {
            return Vec::new();
        };

        let mut names = Vec::new();
        for rule in spec.rules.iter().flatten() {
            let paths = rule.http.as_ref().and_then(|http| http.paths.as_ref());
            for path in paths.into_iter().flatten() {
                if let Some(name) = path.backend.as_ref().and_then(IngressBackend::service_name) {
                    names.push(name);
                }
            }
        }

        for backend in [&spec.backend, &spec.default_backend].into_iter().flatten() {
            if let Some(name) = backend.service_name() {
                names.push(name);
            }
        }

        names
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceView {
    pub spec: Option<ServiceSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSpec {
    #[serde(deserialize_with = "scalar_map")]
    pub selector: Option<Labels>,
}

impl ServiceView {
    pub fn selector(&self) -> Option<&Labels> {
        self.spec.as_ref().and_then(|spec| spec.selector.as_ref())
    }

    /// True when the selector is non-empty and every entry is present with an
    /// equal value in `labels`. An empty selector selects nothing.
    pub fn selects(&self, labels: &Labels) -> bool {
        match self.selector() {
            Some(selector) if !selector.is_empty() => selector
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value)),
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workload controllers
// ─────────────────────────────────────────────────────────────────────────────

/// Shared shape of `Deployment` and `DaemonSet`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkloadView {
    pub metadata: ObjectMeta,
    pub spec: Option<WorkloadSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkloadSpec {
    pub template: Option<PodTemplate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodTemplate {
    pub metadata: TemplateMeta,
}

/// Only the labels of a pod template matter; its annotations are never read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateMeta {
    #[serde(deserialize_with = "scalar_map")]
    pub labels: Option<Labels>,
}

impl WorkloadView {
    pub fn labels(&self) -> Option<&Labels> {
        self.metadata.labels.as_ref()
    }

    pub fn template_labels(&self) -> Option<&Labels> {
        self.spec
            .as_ref()
            .and_then(|spec| spec.template.as_ref())
            .and_then(|template| template.metadata.labels.as_ref())
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }

    /// True if the service selects either the controller's own labels or its
    /// pod template labels.
    pub fn is_selected_by(&self, service: &ServiceView) -> bool {
        [self.labels(), self.template_labels()]
            .into_iter()
            .flatten()
            .any(|labels| service.selects(labels))
    }
}

/// Splits a reference annotation into service names.
///
/// Segments are trimmed; empty segments are dropped.
pub fn split_references(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|name| !name.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// A manifest seen through the view its kind calls for.
#[derive(Debug, Clone)]
pub enum TypedResource {
    Ingress(IngressView),
    Service(ServiceView),
    Workload(WorkloadView),
    /// No resolution rule applies.
    Opaque,
}

impl TypedResource {
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        Ok(match manifest.kind {
            ResourceKind::Ingress => Self::Ingress(manifest.view()?),
            ResourceKind::Service => Self::Service(manifest.view()?),
            ResourceKind::Deployment | ResourceKind::DaemonSet => {
                Self::Workload(manifest.view()?)
            }
            ResourceKind::UnknownService | ResourceKind::Other(_) => Self::Opaque,
        })
    }

    pub fn as_workload(&self) -> Option<&WorkloadView> {
        match self {
            Self::Workload(view) => Some(view),
            _ => None,
        }
    }
}
