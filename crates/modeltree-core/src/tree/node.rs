//! Tree nodes.

use super::descriptor::{Edge, JoinType};

/// One reachable entity's position in a model tree.
///
/// Nodes live in an arena owned by the tree; `parent` and `children` are
/// indexes into it. The full path is recovered by walking parents, see
/// [`ModelTree::path_of`](super::ModelTree::path_of).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Label of the entity this node stands for.
    pub entity: String,
    /// Index of the node one hop closer to the root.
    pub parent: Option<usize>,
    /// Edge from the parent to this node.
    pub edge: Option<Edge>,
    /// Hop count from the root.
    pub depth: usize,
    /// Indexes of nodes one hop further from the root.
    pub children: Vec<usize>,
    outer: bool,
}

impl TreeNode {
    pub(crate) fn root(entity: String) -> Self {
        Self {
            entity,
            parent: None,
            edge: None,
            depth: 0,
            children: Vec::new(),
            outer: false,
        }
    }

    pub(crate) fn child(parent_index: usize, parent: &TreeNode, edge: Edge) -> Self {
        let outer = parent.outer || edge.join_type() == JoinType::LeftOuter;
        Self {
            entity: edge.target.clone(),
            parent: Some(parent_index),
            edge: Some(edge),
            depth: parent.depth + 1,
            children: Vec::new(),
            outer,
        }
    }

    /// Check if this is the root node.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Accessor of the edge into this node; `None` at the root.
    pub fn accessor(&self) -> Option<&str> {
        self.edge.as_ref().map(|edge| edge.accessor.as_str())
    }

    /// Join type of the edge into this node after promotion along the path.
    ///
    /// Once any hop on the path is an outer join, every later hop is outer too.
    pub fn join_type(&self) -> Option<JoinType> {
        self.edge.as_ref().map(|_| {
            if self.outer {
                JoinType::LeftOuter
            } else {
                JoinType::Inner
            }
        })
    }
}
