//! Lazily built, shared model trees.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::catalog::SchemaSource;
use crate::config::{RegistryConfig, TreeConfig};
use crate::error::{Error, Result};
use crate::tree::{resolve_global, ModelTree, TreeBuilder, TreeOptions};

type Slot = Arc<Mutex<Option<Arc<ModelTree>>>>;

/// Cache of model trees keyed by alias or entity label.
///
/// Trees are built on first request. Concurrent first requests for the same
/// key build once: the first caller builds while holding the key's slot lock
/// and the others wait on it. Failed builds leave the slot empty.
pub struct TreeRegistry {
    schema: Arc<dyn SchemaSource>,
    config: RegistryConfig,
    slots: DashMap<String, Slot>,
    builds: AtomicU64,
}

impl TreeRegistry {
    /// Create a registry over `schema`.
    pub fn new(schema: Arc<dyn SchemaSource>, config: RegistryConfig) -> Self {
        Self {
            schema,
            config,
            slots: DashMap::new(),
            builds: AtomicU64::new(0),
        }
    }

    /// Registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of configured aliases.
    pub fn configured(&self) -> usize {
        self.config.trees.len()
    }

    /// Get (building if needed) the tree for `key`.
    ///
    /// `key` is a configured alias, the root label of a configured tree (which
    /// maps to that tree's alias), or any entity label or unique short name
    /// (a tree rooted there with default options).
    pub fn get(&self, key: &str) -> Result<Arc<ModelTree>> {
        let (cache_key, tree) = self.resolve_key(key)?;

        let slot = self.slots.entry(cache_key.clone()).or_default().clone();
        let mut guard = slot.lock();
        if let Some(tree) = guard.as_ref() {
            return Ok(tree.clone());
        }

        let builder = TreeBuilder::new(self.schema.clone()).with_options(tree.options);
        let builder = match tree.root {
            Some(root) => builder.root(root),
            None => builder,
        };

        match builder.build() {
            Ok(tree) => {
                let tree = Arc::new(tree);
                *guard = Some(tree.clone());
                self.builds.fetch_add(1, Ordering::Relaxed);
                info!(
                    key = %cache_key,
                    root = %tree.root_entity().label(),
                    nodes = tree.len(),
                    "Built model tree"
                );
                Ok(tree)
            }
            Err(e) => {
                warn!(key = %cache_key, error = %e, "Failed to build model tree");
                Err(e)
            }
        }
    }

    /// Tree of the configured default alias.
    pub fn default_tree(&self) -> Result<Arc<ModelTree>> {
        self.get(&self.config.default)
    }

    /// Build an uncached tree rooted at `root` with default options.
    pub fn create(&self, root: &str) -> Result<ModelTree> {
        TreeBuilder::new(self.schema.clone()).root(root).build()
    }

    /// Number of trees built and cached.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().lock().is_some())
            .count()
    }

    /// Check if no tree has been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful builds since creation.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Drop every cached tree.
    pub fn reset(&self) {
        self.slots.clear();
    }

    fn resolve_key(&self, key: &str) -> Result<(String, TreeConfig)> {
        if let Some(tree) = self.config.tree(key) {
            return Ok((key.to_string(), tree));
        }

        let entity = match resolve_global(self.schema.as_ref(), key.into()) {
            Ok(entity) => entity,
            Err(Error::ModelDoesNotExist(_)) => return Err(Error::UnknownAlias(key.to_string())),
            Err(e) => return Err(e),
        };

        let configured = self.config.trees.iter().find(|(_, tree)| {
            tree.root.as_deref().is_some_and(|root| {
                resolve_global(self.schema.as_ref(), root.into())
                    .is_ok_and(|e| e.key() == entity.key())
            })
        });
        if let Some((alias, _)) = configured {
            if let Some(tree) = self.config.tree(alias) {
                return Ok((alias.clone(), tree));
            }
        }

        Ok((
            entity.key(),
            TreeConfig {
                root: Some(entity.label()),
                options: TreeOptions::default(),
            },
        ))
    }
}
