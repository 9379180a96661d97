//! Entity references accepted by tree lookups.

use std::fmt;

use crate::catalog::{EntityDef, SchemaSource};
use crate::error::{Error, Result};

/// A way of naming an entity.
///
/// A `Label` containing a `.` is treated as a fully-qualified `app.Name`;
/// without one it is a short name matched across every app. Matching is
/// case-insensitive throughout.
#[derive(Debug, Clone, Copy)]
pub enum ModelRef<'a> {
    /// `app.Name` or a bare `Name`.
    Label(&'a str),
    /// An explicit app and short name pair.
    InApp {
        /// App the entity is declared in.
        app: &'a str,
        /// Short entity name.
        name: &'a str,
    },
    /// An entity definition taken from the schema.
    Entity(&'a EntityDef),
}

impl ModelRef<'_> {
    /// Check whether `entity` is named by this reference.
    pub fn matches(&self, entity: &EntityDef) -> bool {
        match self {
            ModelRef::Label(label) if label.contains('.') => entity.has_label(label),
            ModelRef::Label(name) => entity.has_name(name),
            ModelRef::InApp { app, name } => {
                entity.app.eq_ignore_ascii_case(app) && entity.has_name(name)
            }
            ModelRef::Entity(def) => def.key() == entity.key(),
        }
    }
}

impl fmt::Display for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRef::Label(label) => f.write_str(label),
            ModelRef::InApp { app, name } => write!(f, "{app}.{name}"),
            ModelRef::Entity(def) => write!(f, "{}.{}", def.app, def.name),
        }
    }
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(label: &'a str) -> Self {
        ModelRef::Label(label)
    }
}

impl<'a> From<&'a String> for ModelRef<'a> {
    fn from(label: &'a String) -> Self {
        ModelRef::Label(label.as_str())
    }
}

impl<'a> From<(&'a str, &'a str)> for ModelRef<'a> {
    fn from((app, name): (&'a str, &'a str)) -> Self {
        ModelRef::InApp { app, name }
    }
}

impl<'a> From<&'a EntityDef> for ModelRef<'a> {
    fn from(entity: &'a EntityDef) -> Self {
        ModelRef::Entity(entity)
    }
}

/// Every schema entity named by `reference`, in declaration order.
pub(crate) fn matching<'s>(schema: &'s dyn SchemaSource, reference: ModelRef<'_>) -> Vec<&'s EntityDef> {
    schema
        .entities()
        .into_iter()
        .filter(|e| reference.matches(e))
        .collect()
}

/// Resolve `reference` against the whole schema, ignoring reachability.
pub(crate) fn resolve_global<'s>(
    schema: &'s dyn SchemaSource,
    reference: ModelRef<'_>,
) -> Result<&'s EntityDef> {
    let mut found = matching(schema, reference);
    match found.len() {
        0 => Err(Error::ModelDoesNotExist(reference.to_string())),
        1 => Ok(found.remove(0)),
        _ => Err(Error::ModelNotUnique {
            reference: reference.to_string(),
            candidates: found.iter().map(|e| e.label()).collect(),
        }),
    }
}
