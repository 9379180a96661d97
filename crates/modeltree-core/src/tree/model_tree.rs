//! Built model trees and the lookups they answer.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use super::descriptor::Edge;
use super::node::TreeNode;
use super::reference::{matching, ModelRef};
use crate::catalog::{EntityDef, FieldDef, SchemaSource};
use crate::error::{Error, Result};

/// A field resolved against a tree, together with its owning entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRef<'t> {
    /// Entity declaring the field.
    pub entity: &'t EntityDef,
    /// The field itself.
    pub field: &'t FieldDef,
}

/// Shortest-path tree over the entities reachable from one root.
///
/// Immutable once built; safe to share across threads behind an `Arc`.
pub struct ModelTree {
    schema: Arc<dyn SchemaSource>,
    root: EntityDef,
    nodes: Vec<TreeNode>,
    index: HashMap<String, usize>,
    alias: Option<String>,
}

impl fmt::Debug for ModelTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelTree")
            .field("root", &self.root.label())
            .field("alias", &self.alias)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl ModelTree {
    pub(crate) fn new(
        schema: Arc<dyn SchemaSource>,
        root: EntityDef,
        nodes: Vec<TreeNode>,
        index: HashMap<String, usize>,
        alias: Option<String>,
    ) -> Self {
        Self {
            schema,
            root,
            nodes,
            index,
            alias,
        }
    }

    /// Schema the tree was built from.
    pub fn schema(&self) -> &dyn SchemaSource {
        self.schema.as_ref()
    }

    /// Root entity definition.
    pub fn root_entity(&self) -> &EntityDef {
        &self.root
    }

    /// Root node.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    /// Registry alias, if the tree was built through one.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// All nodes in breadth-first order, root first.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Number of reachable entities, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Greatest node depth.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Check if the entity with this fully-qualified label is reachable.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(&label.to_ascii_lowercase())
    }

    /// Resolve a reference to exactly one reachable entity.
    ///
    /// With `local` set, the candidates are the reachable entities the
    /// reference names, so a short name shared with an unreachable entity
    /// still resolves. Without it, the reference must name one entity across
    /// the whole schema, and that entity must be reachable. Neither scope
    /// falls back to the other.
    pub fn get_model<'r>(
        &self,
        reference: impl Into<ModelRef<'r>>,
        local: bool,
    ) -> Result<&EntityDef> {
        let reference = reference.into();
        let known = matching(self.schema(), reference);
        if known.is_empty() {
            return Err(Error::ModelDoesNotExist(reference.to_string()));
        }

        let candidates: Vec<&EntityDef> = known
            .into_iter()
            .filter(|e| !local || self.index.contains_key(&e.key()))
            .collect();
        let not_related = || Error::ModelNotRelated {
            model: reference.to_string(),
            root: self.root.label(),
        };

        match candidates.as_slice() {
            [] => Err(not_related()),
            [entity] if self.index.contains_key(&entity.key()) => Ok(*entity),
            [_] => Err(not_related()),
            _ => Err(Error::ModelNotUnique {
                reference: reference.to_string(),
                candidates: candidates.iter().map(|e| e.label()).collect(),
            }),
        }
    }

    /// Node of a reachable entity.
    pub fn node<'r>(&self, entity: impl Into<ModelRef<'r>>) -> Result<&TreeNode> {
        let entity = self.get_model(entity, false)?;
        self.index
            .get(&entity.key())
            .map(|&i| &self.nodes[i])
            .ok_or_else(|| Error::ModelNotRelated {
                model: entity.label(),
                root: self.root.label(),
            })
    }

    /// Edges from the root to `node`, root side first.
    ///
    /// `node` must belong to this tree.
    pub fn path_of<'a>(&'a self, node: &'a TreeNode) -> Vec<&'a Edge> {
        let mut path = Vec::with_capacity(node.depth);
        let mut current = node;
        while let (Some(edge), Some(parent)) = (current.edge.as_ref(), current.parent) {
            path.push(edge);
            current = &self.nodes[parent];
        }
        path.reverse();
        path
    }

    /// Query-string prefix of `node`; empty at the root.
    pub fn query_string_of(&self, node: &TreeNode) -> String {
        self.path_of(node)
            .iter()
            .map(|edge| edge.accessor.as_str())
            .collect::<Vec<_>>()
            .join("__")
    }

    /// Edges from the root to a reachable entity.
    pub fn path_to<'r>(&self, entity: impl Into<ModelRef<'r>>) -> Result<Vec<&Edge>> {
        Ok(self.path_of(self.node(entity)?))
    }

    /// Resolve a field by name or column on a reachable entity.
    pub fn get_field<'r>(&self, name: &str, entity: impl Into<ModelRef<'r>>) -> Result<FieldRef<'_>> {
        let entity = self.get_model(entity, false)?;
        let field = entity
            .get_field(name)
            .ok_or_else(|| Error::FieldDoesNotExist {
                entity: entity.label(),
                field: name.to_string(),
            })?;
        Ok(FieldRef { entity, field })
    }

    /// Accessor path from the root to an entity, e.g. `employee__title`.
    ///
    /// Empty for the root itself.
    pub fn query_string<'r>(&self, entity: impl Into<ModelRef<'r>>) -> Result<String> {
        Ok(self.query_string_of(self.node(entity)?))
    }

    /// Query string addressing a field from the root, e.g. `employee__title__salary`.
    pub fn query_string_for_field(&self, field: &FieldRef<'_>) -> Result<String> {
        let prefix = self.query_string(field.entity)?;
        if prefix.is_empty() {
            Ok(field.field.name.clone())
        } else {
            Ok(format!("{prefix}__{}", field.field.name))
        }
    }

    /// Query string with a lookup operator appended, e.g. `title__salary__gt`.
    pub fn lookup_for_field(&self, field: &FieldRef<'_>, operator: &str) -> Result<String> {
        Ok(format!("{}__{operator}", self.query_string_for_field(field)?))
    }

    /// Indented dump of the tree, one line per node.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_node(0, &mut out);
        out
    }

    fn describe_node(&self, index: usize, out: &mut String) {
        let node = &self.nodes[index];
        let indent = "  ".repeat(node.depth);
        match (&node.edge, node.join_type()) {
            (Some(edge), Some(join_type)) => {
                let _ = writeln!(
                    out,
                    "{indent}{} -> {} ({join_type})",
                    edge.accessor, node.entity
                );
            }
            _ => {
                let _ = writeln!(out, "{}", node.entity);
            }
        }
        for &child in &node.children {
            self.describe_node(child, out);
        }
    }
}
