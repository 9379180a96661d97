//! Options restricting which entities and edges a tree may use.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::descriptor::Edge;
use super::reference::resolve_global;
use crate::catalog::SchemaSource;
use crate::error::Result;

/// An edge between two entities, optionally pinned to one accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Entity the edge leaves from.
    pub source: String,
    /// Entity the edge arrives at.
    pub target: String,
    /// Accessor or declared relation name; any edge between the pair when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Route {
    /// A route matching every edge from `source` to `target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            field: None,
        }
    }

    /// Pin the route to one accessor or relation name.
    pub fn via(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Per-tree restrictions applied during the breadth-first build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// Entities never entered.
    #[serde(default)]
    pub excluded_models: Vec<String>,
    /// When non-empty, the only entities (besides the root) that may be entered.
    #[serde(default)]
    pub included_models: Vec<String>,
    /// Edges never traversed.
    #[serde(default)]
    pub excluded_routes: Vec<Route>,
    /// Entities targeted here may only be entered through a matching edge.
    #[serde(default)]
    pub required_routes: Vec<Route>,
    /// Registry alias the tree is cached under.
    #[serde(skip)]
    pub alias: Option<String>,
}

impl TreeOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Never enter `label`.
    pub fn with_excluded_model(mut self, label: impl Into<String>) -> Self {
        self.excluded_models.push(label.into());
        self
    }

    /// Restrict the tree to `label` (and any other included models).
    pub fn with_included_model(mut self, label: impl Into<String>) -> Self {
        self.included_models.push(label.into());
        self
    }

    /// Never traverse edges matching `route`.
    pub fn with_excluded_route(mut self, route: Route) -> Self {
        self.excluded_routes.push(route);
        self
    }

    /// Enter the route's target only through `route`.
    pub fn with_required_route(mut self, route: Route) -> Self {
        self.required_routes.push(route);
        self
    }

    /// Record the registry alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Resolve every label against the schema.
    pub(crate) fn resolve(&self, schema: &dyn SchemaSource) -> Result<Constraints> {
        let keys = |labels: &[String]| -> Result<HashSet<String>> {
            labels
                .iter()
                .map(|label| resolve_global(schema, label.as_str().into()).map(|e| e.key()))
                .collect()
        };
        let routes = |routes: &[Route]| -> Result<Vec<ResolvedRoute>> {
            routes
                .iter()
                .map(|route| {
                    Ok(ResolvedRoute {
                        source: resolve_global(schema, route.source.as_str().into())?.key(),
                        target: resolve_global(schema, route.target.as_str().into())?.key(),
                        field: route.field.clone(),
                    })
                })
                .collect()
        };

        Ok(Constraints {
            excluded: keys(&self.excluded_models)?,
            included: keys(&self.included_models)?,
            excluded_routes: routes(&self.excluded_routes)?,
            required_routes: routes(&self.required_routes)?,
        })
    }
}

#[derive(Debug)]
pub(crate) struct ResolvedRoute {
    source: String,
    target: String,
    field: Option<String>,
}

impl ResolvedRoute {
    fn matches(&self, edge: &Edge) -> bool {
        edge.source.eq_ignore_ascii_case(&self.source)
            && edge.target.eq_ignore_ascii_case(&self.target)
            && self.field.as_deref().map_or(true, |f| edge.matches_name(f))
    }
}

/// Options with every label resolved to a lookup key.
#[derive(Debug, Default)]
pub(crate) struct Constraints {
    pub(crate) excluded: HashSet<String>,
    included: HashSet<String>,
    excluded_routes: Vec<ResolvedRoute>,
    required_routes: Vec<ResolvedRoute>,
}

impl Constraints {
    /// Check whether `edge` may be used to enter its target.
    pub(crate) fn allows(&self, edge: &Edge) -> bool {
        let target = edge.target.to_ascii_lowercase();
        if self.excluded.contains(&target) {
            return false;
        }
        if !self.included.is_empty() && !self.included.contains(&target) {
            return false;
        }
        if self.excluded_routes.iter().any(|r| r.matches(edge)) {
            return false;
        }

        let mut required = self
            .required_routes
            .iter()
            .filter(|r| r.target == target)
            .peekable();
        required.peek().is_none() || required.any(|r| r.matches(edge))
    }
}
