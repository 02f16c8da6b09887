//! Parsed manifest documents.
//!
//! Each document is parsed exactly once into a generic YAML value. Kind and
//! name are pulled out eagerly; everything else is read later through typed
//! views (see `views`).

use crate::error::{ManifestError, Result};
use crate::kind::{resource_key, ResourceKind};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// One resource declaration loaded from disk.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub kind: ResourceKind,
    pub name: String,
    /// The whole document, retained for typed views.
    pub body: Value,
    /// File the document came from.
    pub source: PathBuf,
}

impl Manifest {
    /// Builds a manifest from a parsed document.
    ///
    /// Returns `Ok(None)` for documents without a string `kind`; those are not
    /// resources and are skipped. A document that does declare a kind must
    /// carry `metadata.name`.
    pub fn from_value(body: Value, source: &Path) -> Result<Option<Self>> {
        let kind = match body.get("kind").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => return Ok(None),
        };

        let name = body
            .get("metadata")
            .and_then(|meta| meta.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| ManifestError::MissingField {
                path: source.to_path_buf(),
                kind: kind.clone(),
                field: "metadata.name",
            })?
            .to_string();

        Ok(Some(Self {
            kind: ResourceKind::from_kind(&kind),
            name,
            body,
            source: source.to_path_buf(),
        }))
    }

    /// The internal `kind/name` lookup key.
    pub fn key(&self) -> String {
        resource_key(self.kind.as_str(), &self.name)
    }

    /// Derives a typed view of the body.
    ///
    /// A mismatch between the body and the view's shape is an `InvalidShape`
    /// error naming this resource.
    pub fn view<'a, T: Deserialize<'a>>(&'a self) -> Result<T> {
        T::deserialize(&self.body)
            .map_err(|e| ManifestError::invalid_shape(self.kind.as_str(), &self.name, e))
    }
}
