//! Error types for manifest loading and typed views.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Everything that can abort a manifest load or a typed re-derivation.
///
/// There is no partial result: the first error ends the build.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory walk itself failed (permissions, broken links, loops).
    #[error("failed to traverse manifest tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The file is not valid YAML.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document declared a kind but is missing a field every resource needs.
    #[error("{kind} document in {path} is missing `{field}`")]
    MissingField {
        path: PathBuf,
        kind: String,
        field: &'static str,
    },

    /// A recognized kind does not have the structure that kind requires.
    #[error("{kind} `{name}` has an unexpected shape: {reason}")]
    InvalidShape {
        kind: String,
        name: String,
        reason: String,
    },

    /// `List` documents nested deeper than the configured limit.
    #[error("List nesting in {path} exceeds depth {depth}")]
    NestingTooDeep { path: PathBuf, depth: usize },

    /// Two loaded resources share a kind and name.
    #[error("duplicate resource {key}")]
    DuplicateResource { key: String },

    /// The build configuration file could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl ManifestError {
    /// Wraps an I/O failure with the path that caused it.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn yaml(path: impl AsRef<Path>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_shape(kind: impl Into<String>, name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidShape {
            kind: kind.into(),
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures of the filesystem rather than of the content.
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Walk(_))
    }
}
