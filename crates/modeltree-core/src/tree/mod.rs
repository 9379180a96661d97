//! Shortest-path model trees.
//!
//! A tree is built once per root by a breadth-first traversal of the
//! relation graph and then answers lookups: which entity a reference names,
//! how to address a field from the root, and which joins reach it.

mod builder;
mod descriptor;
mod model_tree;
mod node;
mod options;
mod reference;

pub use builder::TreeBuilder;
pub use descriptor::{outgoing_edges, Direction, Edge, JoinStep, JoinType};
pub use model_tree::{FieldRef, ModelTree};
pub use node::TreeNode;
pub use options::{Route, TreeOptions};
pub use reference::ModelRef;

pub(crate) use reference::resolve_global;
