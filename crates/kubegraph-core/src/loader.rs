//! Manifest loader.
//!
//! Walks a root path, parses every YAML file, and expands `List` documents
//! into their items. Directory entries are visited in file-name order so that
//! repeated loads of an unchanged tree produce the same sequence.

use crate::config::BuildConfig;
use crate::document::Manifest;
use crate::error::{ManifestError, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Loads manifests from disk according to a `BuildConfig`.
pub struct ManifestLoader<'a> {
    config: &'a BuildConfig,
}

impl<'a> ManifestLoader<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// Loads every resource under `root`, in traversal order.
    ///
    /// `root` may be a directory or a single file. The first unreadable file
    /// or malformed document fails the whole load.
    pub fn load(&self, root: &Path) -> Result<Vec<Manifest>> {
        let mut manifests = Vec::new();
        let mut files = 0usize;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.config.matches_extension(entry.path()) {
                continue;
            }

            let path = entry.path();
            let text = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
            let before = manifests.len();
            self.load_str(&text, path, &mut manifests)?;
            files += 1;

            debug!(
                "Loaded {} resources from {}",
                manifests.len() - before,
                path.display()
            );
        }

        info!(
            "Loaded {} resources from {} files under {}",
            manifests.len(),
            files,
            root.display()
        );

        Ok(manifests)
    }

    /// Parses one file's contents, appending its resources to `out`.
    ///
    /// A file may hold several `---` separated documents.
    pub fn load_str(&self, text: &str, path: &Path, out: &mut Vec<Manifest>) -> Result<()> {
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document).map_err(|e| ManifestError::yaml(path, e))?;
            self.expand(value, path, 0, out)?;
        }
        Ok(())
    }

    fn expand(&self, value: Value, path: &Path, depth: usize, out: &mut Vec<Manifest>) -> Result<()> {
        if depth > self.config.max_list_depth {
            return Err(ManifestError::NestingTooDeep {
                path: path.to_path_buf(),
                depth: self.config.max_list_depth,
            });
        }

        if is_list(&value) {
            let items = match value {
                Value::Mapping(mut map) => map.remove("items"),
                _ => None,
            };
            match items {
                Some(Value::Sequence(items)) => {
                    for item in items {
                        self.expand(item, path, depth + 1, out)?;
                    }
                }
                _ => debug!("List without items in {}", path.display()),
            }
            return Ok(());
        }

        match Manifest::from_value(value, path)? {
            Some(manifest) => out.push(manifest),
            None => debug!("Skipping document without kind in {}", path.display()),
        }
        Ok(())
    }
}

fn is_list(value: &Value) -> bool {
    value.get("kind").and_then(Value::as_str) == Some("List")
}
