//! Relation definitions between entities.

use serde::{Deserialize, Serialize};

/// Cardinality of a relation, seen from the side it is traversed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One-to-one relation (unique foreign key).
    OneToOne,
    /// Many-to-one relation (foreign key on this side).
    ManyToOne,
    /// One-to-many relation (foreign key on the other side).
    OneToMany,
    /// Many-to-many relation (requires a through table).
    ManyToMany,
}

/// Join table backing a many-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Through {
    /// Join table name.
    pub table: String,
    /// Column referencing the declaring entity.
    pub source_column: String,
    /// Column referencing the target entity.
    pub target_column: String,
}

impl Through {
    /// Create a through table description.
    pub fn new(
        table: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// Reverse accessor marker that hides the reverse direction.
pub const HIDDEN_REVERSE: &str = "+";

/// A relation declared on one entity and pointing at another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Accessor name on the declaring entity.
    pub name: String,
    /// Declaring entity label.
    pub from_entity: String,
    /// Target entity label.
    pub to_entity: String,
    /// Declared cardinality: many-to-one, one-to-one or many-to-many.
    pub cardinality: Cardinality,
    /// Foreign key column on the declaring entity (`{name}_id` when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field: Option<String>,
    /// Referenced column on the target (its identity column when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    /// Whether the foreign key accepts NULL.
    #[serde(default)]
    pub nullable: bool,
    /// Reverse accessor name; `"+"` hides the reverse direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_name: Option<String>,
    /// Explicit through table for many-to-many relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<Through>,
}

impl RelationDef {
    fn declare(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality,
            from_field: None,
            to_field: None,
            nullable: false,
            related_name: None,
            through: None,
        }
    }

    /// Create a foreign key relation.
    pub fn many_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::declare(name, from_entity, to_entity, Cardinality::ManyToOne)
    }

    /// Create a one-to-one relation.
    pub fn one_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::declare(name, from_entity, to_entity, Cardinality::OneToOne)
    }

    /// Create a many-to-many relation.
    pub fn many_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::declare(name, from_entity, to_entity, Cardinality::ManyToMany)
    }

    /// Allow NULL in the foreign key.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the reverse accessor name.
    pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }

    /// Hide the reverse direction of this relation.
    pub fn without_reverse(self) -> Self {
        self.with_related_name(HIDDEN_REVERSE)
    }

    /// Set the foreign key and referenced columns.
    pub fn with_columns(mut self, from_field: impl Into<String>, to_field: impl Into<String>) -> Self {
        self.from_field = Some(from_field.into());
        self.to_field = Some(to_field.into());
        self
    }

    /// Set an explicit through table.
    pub fn with_through(mut self, through: Through) -> Self {
        self.through = Some(through);
        self
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Check if the reverse direction is hidden.
    pub fn is_reverse_hidden(&self) -> bool {
        self.related_name.as_deref() == Some(HIDDEN_REVERSE)
    }

    /// Foreign key column on the declaring entity.
    pub fn fk_column(&self) -> String {
        self.from_field
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.name))
    }

    /// Check whether the relation is declared on `label` (case-insensitive).
    pub fn is_from(&self, label: &str) -> bool {
        self.from_entity.eq_ignore_ascii_case(label)
    }

    /// Check whether the relation targets `label` (case-insensitive).
    pub fn is_to(&self, label: &str) -> bool {
        self.to_entity.eq_ignore_ascii_case(label)
    }
}
