//! Entity definitions.

use super::field::FieldDef;
use serde::{Deserialize, Serialize};

/// An entity definition (table schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Logical grouping the entity is declared in.
    pub app: String,
    /// Short entity name (unique within its app).
    pub name: String,
    /// Table name; derived from app and name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Name of the primary identity field.
    #[serde(default = "default_identity")]
    pub identity_field: String,
    /// Concrete fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

fn default_identity() -> String {
    "id".to_string()
}

impl EntityDef {
    /// Create a new entity definition with an `id` identity field.
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
            table: None,
            identity_field: default_identity(),
            fields: Vec::new(),
        }
    }

    /// Override the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the identity field name.
    pub fn with_identity(mut self, identity_field: impl Into<String>) -> Self {
        self.identity_field = identity_field.into();
        self
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Fully-qualified label, `app.Name`.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app, self.name)
    }

    /// Lower-cased label used as a lookup key.
    pub fn key(&self) -> String {
        self.label().to_ascii_lowercase()
    }

    /// Lower-cased short name, the default reverse accessor.
    pub fn model_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Table backing this entity.
    pub fn table(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.app, self.model_name()).to_ascii_lowercase())
    }

    /// Check a fully-qualified label (case-insensitive).
    pub fn has_label(&self, label: &str) -> bool {
        match label.split_once('.') {
            Some((app, name)) => {
                self.app.eq_ignore_ascii_case(app) && self.name.eq_ignore_ascii_case(name)
            }
            None => false,
        }
    }

    /// Check a short name (case-insensitive).
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Get a field by name or column.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.matches(name)))
    }

    /// Column of the identity field.
    pub fn identity_column(&self) -> &str {
        self.get_field(&self.identity_field)
            .map(FieldDef::column)
            .unwrap_or(&self.identity_field)
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::column)
    }
}
