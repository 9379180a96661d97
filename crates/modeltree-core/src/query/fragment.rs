//! Select query fragments assembled from tree paths.

use std::fmt;

use crate::tree::{JoinStep, JoinType};

/// Equality condition of a join: `lhs_alias.lhs_column = rhs_alias.rhs_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    /// Alias of the table already in the query.
    pub lhs_alias: String,
    /// Column on the left-hand table.
    pub lhs_column: String,
    /// Alias of the joined table.
    pub rhs_alias: String,
    /// Column on the joined table.
    pub rhs_column: String,
}

/// One emitted join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// INNER or LEFT OUTER.
    pub join_type: JoinType,
    /// Joined table.
    pub table: String,
    /// Alias the table is referenced by; equals `table` unless it was taken.
    pub alias: String,
    /// ON clause.
    pub condition: JoinCondition,
}

/// A projected column, qualified by the alias of its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Alias of the table the column belongs to.
    pub alias: String,
    /// Column name.
    pub column: String,
}

impl Column {
    /// Create a column reference `alias.column`.
    pub fn new(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            column: column.into(),
        }
    }
}

/// A `SELECT` over a base table with ordered joins and projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    table: String,
    joins: Vec<Join>,
    projection: Vec<Column>,
}

impl SelectQuery {
    /// Create a query over `table` with nothing selected.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            joins: Vec::new(),
            projection: Vec::new(),
        }
    }

    /// Base table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Alias of the base table; always the table name.
    pub fn base_alias(&self) -> &str {
        &self.table
    }

    /// Joins in emission order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Projected columns in order.
    pub fn projection(&self) -> &[Column] {
        &self.projection
    }

    /// Append a projected column.
    pub fn with_column(mut self, alias: impl Into<String>, column: impl Into<String>) -> Self {
        self.projection.push(Column::new(alias, column));
        self
    }

    /// Replace the projection.
    pub fn set_projection(&mut self, projection: Vec<Column>) {
        self.projection = projection;
    }

    /// Join `step` onto the table aliased `lhs_alias`, returning the alias of
    /// the joined table.
    ///
    /// An identical join already present is reused. Reusing it with an outer
    /// join type demotes it to outer.
    pub fn join(&mut self, lhs_alias: &str, step: &JoinStep, join_type: JoinType) -> String {
        if let Some(existing) = self.joins.iter_mut().find(|j| {
            j.table == step.table
                && j.condition.lhs_alias == lhs_alias
                && j.condition.lhs_column == step.lhs_column
                && j.condition.rhs_column == step.rhs_column
        }) {
            if join_type == JoinType::LeftOuter {
                existing.join_type = JoinType::LeftOuter;
            }
            return existing.alias.clone();
        }

        let alias = if self.alias_in_use(&step.table) {
            self.next_alias()
        } else {
            step.table.clone()
        };

        self.joins.push(Join {
            join_type,
            table: step.table.clone(),
            alias: alias.clone(),
            condition: JoinCondition {
                lhs_alias: lhs_alias.to_string(),
                lhs_column: step.lhs_column.clone(),
                rhs_alias: alias.clone(),
                rhs_column: step.rhs_column.clone(),
            },
        });
        alias
    }

    fn alias_in_use(&self, alias: &str) -> bool {
        self.table == alias || self.joins.iter().any(|j| j.alias == alias)
    }

    fn next_alias(&self) -> String {
        let mut n = self.joins.len() + 2;
        loop {
            let alias = format!("T{n}");
            if !self.alias_in_use(&alias) {
                return alias;
            }
            n += 1;
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.projection.is_empty() {
            f.write_str("*")?;
        }
        for (i, column) in self.projection.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{}\".\"{}\"", column.alias, column.column)?;
        }
        write!(f, " FROM \"{}\"", self.table)?;

        for join in &self.joins {
            write!(f, " {} \"{}\"", join.join_type, join.table)?;
            if join.alias != join.table {
                write!(f, " {}", join.alias)?;
            }
            let c = &join.condition;
            write!(
                f,
                " ON (\"{}\".\"{}\" = \"{}\".\"{}\")",
                c.lhs_alias, c.lhs_column, c.rhs_alias, c.rhs_column
            )?;
        }
        Ok(())
    }
}
