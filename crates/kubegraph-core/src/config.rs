//! Build configuration.
//!
//! Defaults match the conventions used by plain `kubectl apply -f` trees.
//! A config can also be read from JSON, in which case any missing field
//! falls back to its default.

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Annotation carrying a comma-separated list of service names.
pub const DEFAULT_REFERENCE_ANNOTATION: &str = "kube.references.services";

/// What to do when two loaded resources share `kind/name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first loaded resource in the lookup index and log a warning.
    /// Both stay enumerable.
    #[default]
    FirstWins,

    /// Fail the build.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// File suffixes (without the dot) parsed as YAML.
    pub extensions: Vec<String>,

    /// Metadata annotation holding explicit service references.
    pub reference_annotation: String,

    /// Maximum nesting of `List` documents before loading fails.
    pub max_list_depth: usize,

    pub duplicates: DuplicatePolicy,

    /// Follow symbolic links while walking the root.
    pub follow_links: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            reference_annotation: DEFAULT_REFERENCE_ANNOTATION.to_string(),
            max_list_depth: 8,
            duplicates: DuplicatePolicy::default(),
            follow_links: false,
        }
    }
}

impl BuildConfig {
    /// Reads a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// True if the file name ends in one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|want| want == ext))
            .unwrap_or(false)
    }
}
