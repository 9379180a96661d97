//! Breadth-first construction of model trees.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, instrument};

use super::descriptor::edges_from;
use super::model_tree::ModelTree;
use super::node::TreeNode;
use super::options::TreeOptions;
use super::reference::resolve_global;
use crate::catalog::{SchemaIndex, SchemaSource};
use crate::error::{Error, Result};

/// Builds a [`ModelTree`] rooted at one entity.
///
/// Every reachable entity is entered exactly once, through the first edge
/// that reaches it in breadth-first order, so each node's path is a shortest
/// path from the root. Equal-length paths are settled by edge enumeration
/// order.
pub struct TreeBuilder {
    schema: Arc<dyn SchemaSource>,
    root: Option<String>,
    options: TreeOptions,
}

impl TreeBuilder {
    /// Create a builder over `schema` with no root set.
    pub fn new(schema: Arc<dyn SchemaSource>) -> Self {
        Self {
            schema,
            root: None,
            options: TreeOptions::default(),
        }
    }

    /// Set the root entity (label or unique short name).
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Replace the build options.
    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the traversal.
    #[instrument(skip(self), fields(root = self.root.as_deref().unwrap_or("")))]
    pub fn build(self) -> Result<ModelTree> {
        let reference = self
            .root
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or(Error::InvalidRoot)?;

        let schema = self.schema.as_ref();
        let root = resolve_global(schema, reference.into())?;
        let constraints = self.options.resolve(schema)?;
        if constraints.excluded.contains(&root.key()) {
            return Err(Error::InvalidConfig(format!(
                "root model {} is excluded",
                root.label()
            )));
        }

        let lookup = SchemaIndex::new(schema);
        let mut nodes = vec![TreeNode::root(root.label())];
        let mut index = HashMap::from([(root.key(), 0usize)]);
        let mut queue = VecDeque::from([0usize]);

        while let Some(current) = queue.pop_front() {
            let entity = lookup
                .entity(&nodes[current].entity)
                .ok_or_else(|| Error::ModelDoesNotExist(nodes[current].entity.clone()))?;

            for edge in edges_from(&lookup, entity)? {
                let key = edge.target.to_ascii_lowercase();
                if index.contains_key(&key) || !constraints.allows(&edge) {
                    continue;
                }

                let child = TreeNode::child(current, &nodes[current], edge);
                let child_index = nodes.len();
                debug!(
                    entity = %child.entity,
                    parent = %nodes[current].entity,
                    accessor = child.accessor().unwrap_or_default(),
                    depth = child.depth,
                    "Entered model"
                );
                nodes[current].children.push(child_index);
                nodes.push(child);
                index.insert(key, child_index);
                queue.push_back(child_index);
            }
        }

        debug!(nodes = nodes.len(), "Model tree built");

        Ok(ModelTree::new(
            self.schema.clone(),
            root.clone(),
            nodes,
            index,
            self.options.alias.clone(),
        ))
    }
}
