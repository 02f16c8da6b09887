use crate::graph::NodeId;
use kubegraph_core::{DuplicatePolicy, ManifestError, Result};
use std::collections::HashMap;
use tracing::warn;

/// Lookup index from `kind/name` keys to graph nodes.
///
/// Keys never leave the builder; callers only ever see numeric ids.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    by_key: HashMap<String, NodeId>,
    policy: DuplicatePolicy,
}

impl Registry {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            by_key: HashMap::new(),
            policy,
        }
    }

    /// Indexes a node under `key`.
    ///
    /// When the key is already taken the policy decides: `FirstWins` keeps the
    /// existing entry, `Reject` returns `DuplicateResource`.
    pub fn insert(&mut self, key: String, id: NodeId) -> Result<()> {
        if let Some(existing) = self.by_key.get(&key) {
            return match self.policy {
                DuplicatePolicy::FirstWins => {
                    warn!(
                        "Duplicate resource {} (node {} shadowed by node {})",
                        key,
                        id.index(),
                        existing.index()
                    );
                    Ok(())
                }
                DuplicatePolicy::Reject => Err(ManifestError::DuplicateResource { key }),
            };
        }
        self.by_key.insert(key, id);
        Ok(())
    }

    /// Indexes a synthesized placeholder. Callers look the key up first, so
    /// it is never already present.
    pub fn insert_placeholder(&mut self, key: String, id: NodeId) {
        self.by_key.entry(key).or_insert(id);
    }

    pub fn resolve(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }
}
