//! Kubegraph Core - manifest loading and typed resource views
//!
//! This crate turns a directory of YAML manifests into an ordered list of
//! resources. Each document is parsed once into a generic value; the few
//! kinds that take part in dependency resolution are read through typed
//! views derived from that value.
//!
//! # Example
//!
//! ```no_run
//! use kubegraph_core::{BuildConfig, ManifestLoader};
//! use std::path::Path;
//!
//! let config = BuildConfig::default();
//! let manifests = ManifestLoader::new(&config).load(Path::new("deploy/"))?;
//! for manifest in &manifests {
//!     println!("{} {}", manifest.kind, manifest.name);
//! }
//! # Ok::<(), kubegraph_core::ManifestError>(())
//! ```

mod config;
mod document;
mod error;
mod kind;
mod loader;
pub mod views;

pub use config::{BuildConfig, DuplicatePolicy, DEFAULT_REFERENCE_ANNOTATION};
pub use document::Manifest;
pub use error::{ManifestError, Result};
pub use kind::{resource_key, ResourceKind, UNKNOWN_SERVICE};
pub use loader::ManifestLoader;
pub use views::TypedResource;
