//! Subcommand handlers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use modeltree_core::{Error, FieldRef, ModelTree, TreeRegistry};

use crate::formatter::Formatter;

type CommandResult = Result<String, Box<dyn std::error::Error>>;

/// Malformed command-line argument.
#[derive(Debug, thiserror::Error)]
pub enum ArgError {
    /// A field argument without an entity or field part.
    #[error("expected Entity.field, got {0:?}")]
    FieldSyntax(String),
}

/// Field argument written as `app.Entity.field` or `Entity.field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldArg {
    /// Entity label or short name.
    pub entity: String,
    /// Field name or column.
    pub field: String,
}

impl FromStr for FieldArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.rsplit_once('.')
            .filter(|(entity, field)| !entity.is_empty() && !field.is_empty())
            .map(|(entity, field)| FieldArg {
                entity: entity.to_string(),
                field: field.to_string(),
            })
            .ok_or_else(|| ArgError::FieldSyntax(s.to_string()))
    }
}

impl fmt::Display for FieldArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Tree for `alias`, or the configured default.
fn select_tree(registry: &TreeRegistry, alias: Option<&str>) -> Result<Arc<ModelTree>, Error> {
    match alias {
        Some(alias) => registry.get(alias),
        None => registry.default_tree(),
    }
}

fn resolve_field<'t>(tree: &'t ModelTree, arg: &FieldArg) -> Result<FieldRef<'t>, Error> {
    tree.get_field(&arg.field, arg.entity.as_str())
}

pub fn tree(registry: &TreeRegistry, alias: Option<&str>, formatter: &dyn Formatter) -> CommandResult {
    let tree = select_tree(registry, alias)?;
    Ok(formatter.format_tree(&tree))
}

pub fn path(
    registry: &TreeRegistry,
    alias: Option<&str>,
    arg: &FieldArg,
    lookup: Option<&str>,
    formatter: &dyn Formatter,
) -> CommandResult {
    let tree = select_tree(registry, alias)?;
    let field = resolve_field(&tree, arg)?;
    let path = match lookup {
        Some(op) => tree.lookup_for_field(&field, op)?,
        None => tree.query_string_for_field(&field)?,
    };
    Ok(formatter.format_path(&arg.to_string(), &path))
}

pub fn sql(
    registry: &TreeRegistry,
    alias: Option<&str>,
    args: &[FieldArg],
    formatter: &dyn Formatter,
) -> CommandResult {
    let tree = select_tree(registry, alias)?;
    let fields = args
        .iter()
        .map(|arg| resolve_field(&tree, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let query = tree.add_select(&fields)?;
    Ok(formatter.format_query(&query))
}
