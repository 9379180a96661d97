//! Modeltree Core - shortest-path join trees over relational schemas.
//!
//! Given a schema of entities and the relations between them, this crate
//! builds, for a chosen root entity, the tree of shortest relation paths to
//! every reachable entity. Trees resolve entity and field references,
//! produce `__`-separated query strings, and emit joins with the right join
//! types.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod query;
pub mod registry;
pub mod tree;

pub use catalog::{
    Cardinality, EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle, SchemaIndex,
    SchemaSource, Through,
};
pub use config::{RegistryConfig, TreeConfig};
pub use error::{Error, Result};
pub use query::{QueryFragmentBuilder, SelectQuery};
pub use registry::TreeRegistry;
pub use tree::{
    Edge, FieldRef, JoinType, ModelRef, ModelTree, Route, TreeBuilder, TreeNode, TreeOptions,
};
