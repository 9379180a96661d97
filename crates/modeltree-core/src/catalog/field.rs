//! Field definitions for entities.

use serde::{Deserialize, Serialize};

/// Scalar column types known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Fixed-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Calendar date.
    Date,
    /// Timestamp.
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

/// A concrete (column-backed) field within an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, as used in query strings.
    pub name: String,
    /// Database column, when it differs from the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Column type.
    #[serde(rename = "type")]
    pub scalar: ScalarType,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldDef {
    /// Create a new non-nullable field.
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            column: None,
            scalar,
            nullable: false,
        }
    }

    /// Create a nullable field.
    pub fn optional(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, scalar)
        }
    }

    /// Store the field under a different column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// The database column backing this field.
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Match against either the field name or its column.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.column() == name
    }
}
