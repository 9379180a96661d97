//! Output formatters for trees, paths and queries.

use clap::ValueEnum;
use modeltree_core::{ModelTree, SelectQuery};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a whole tree.
    fn format_tree(&self, tree: &ModelTree) -> String;

    /// Format the query string of a field.
    fn format_path(&self, field: &str, path: &str) -> String;

    /// Format a select query.
    fn format_query(&self, query: &SelectQuery) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Human-readable formatter.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_tree(&self, tree: &ModelTree) -> String {
        tree.describe().trim_end().to_string()
    }

    fn format_path(&self, _field: &str, path: &str) -> String {
        path.to_string()
    }

    fn format_query(&self, query: &SelectQuery) -> String {
        query.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_tree(&self, tree: &ModelTree) -> String {
        let nodes: Vec<_> = tree
            .nodes()
            .iter()
            .map(|node| {
                serde_json::json!({
                    "entity": node.entity,
                    "depth": node.depth,
                    "parent": node.parent.map(|p| tree.nodes()[p].entity.clone()),
                    "path": tree.query_string_of(node),
                    "join": node.join_type().map(|j| j.to_string()),
                })
            })
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "root": tree.root_entity().label(),
            "alias": tree.alias(),
            "nodes": nodes,
        }))
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_path(&self, field: &str, path: &str) -> String {
        serde_json::json!({ "field": field, "path": path }).to_string()
    }

    fn format_query(&self, query: &SelectQuery) -> String {
        let joins: Vec<_> = query
            .joins()
            .iter()
            .map(|join| {
                let c = &join.condition;
                serde_json::json!({
                    "type": join.join_type.to_string(),
                    "table": join.table,
                    "alias": join.alias,
                    "on": [
                        format!("{}.{}", c.lhs_alias, c.lhs_column),
                        format!("{}.{}", c.rhs_alias, c.rhs_column),
                    ],
                })
            })
            .collect();
        let columns: Vec<_> = query
            .projection()
            .iter()
            .map(|c| format!("{}.{}", c.alias, c.column))
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "table": query.table(),
            "columns": columns,
            "joins": joins,
            "sql": query.to_string(),
        }))
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
