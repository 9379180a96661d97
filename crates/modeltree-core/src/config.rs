//! Registry and per-tree configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::TreeOptions;

/// Alias used when a configuration names no default.
pub const DEFAULT_ALIAS: &str = "default";

fn default_alias() -> String {
    DEFAULT_ALIAS.to_string()
}

/// Configuration of one named tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Root entity label; building fails with `InvalidRoot` when absent.
    #[serde(default, alias = "model")]
    pub root: Option<String>,
    /// Traversal restrictions.
    #[serde(flatten)]
    pub options: TreeOptions,
}

impl TreeConfig {
    /// A tree rooted at `root` with default options.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            options: TreeOptions::default(),
        }
    }

    /// Set the traversal restrictions.
    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }
}

/// Named trees known to a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Alias returned by `default_tree()`.
    #[serde(default = "default_alias")]
    pub default: String,
    /// Tree configurations by alias.
    #[serde(default)]
    pub trees: BTreeMap<String, TreeConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default: default_alias(),
            trees: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tree under `alias`.
    pub fn with_tree(mut self, alias: impl Into<String>, tree: TreeConfig) -> Self {
        self.trees.insert(alias.into(), tree);
        self
    }

    /// Set the default alias.
    pub fn with_default(mut self, alias: impl Into<String>) -> Self {
        self.default = alias.into();
        self
    }

    /// Decode and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, decode and validate a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the default alias names a configured tree.
    ///
    /// An empty configuration is valid; every lookup then goes by entity label.
    pub fn validate(&self) -> Result<()> {
        if !self.trees.is_empty() && !self.trees.contains_key(&self.default) {
            return Err(Error::InvalidConfig(format!(
                "default alias {} is not configured",
                self.default
            )));
        }
        Ok(())
    }

    /// Configuration of `alias`, with the alias recorded on its options.
    pub fn tree(&self, alias: &str) -> Option<TreeConfig> {
        self.trees.get(alias).map(|tree| {
            let mut tree = tree.clone();
            tree.options.alias = Some(alias.to_string());
            tree
        })
    }
}
