//! Join and projection emission along tree paths.

use tracing::debug;

use super::fragment::{Column, SelectQuery};
use crate::error::Result;
use crate::tree::{FieldRef, JoinType, ModelRef, ModelTree};

/// Adds joins and projections to a [`SelectQuery`] rooted at a tree's root.
pub struct QueryFragmentBuilder<'t> {
    tree: &'t ModelTree,
    query: SelectQuery,
}

impl<'t> QueryFragmentBuilder<'t> {
    /// Start from a fresh query selecting every root column.
    pub fn new(tree: &'t ModelTree) -> Self {
        let root = tree.root_entity();
        let mut query = SelectQuery::new(root.table());
        let projection = root
            .columns()
            .map(|c| Column::new(root.table(), c))
            .collect();
        query.set_projection(projection);
        Self { tree, query }
    }

    /// Continue building an existing query over the root table.
    pub fn with_query(tree: &'t ModelTree, query: SelectQuery) -> Self {
        Self { tree, query }
    }

    /// Join every hop from the root to `entity`, returning the joined alias.
    ///
    /// Joins already present are reused. After the first outer hop, every
    /// later hop on the path is joined outer too.
    pub fn add_joins<'r>(&mut self, entity: impl Into<ModelRef<'r>>) -> Result<String> {
        let node = self.tree.node(entity)?;
        let mut alias = self.query.base_alias().to_string();
        let mut outer = false;

        for edge in self.tree.path_of(node) {
            outer = outer || edge.join_type() == JoinType::LeftOuter;
            let join_type = if outer {
                JoinType::LeftOuter
            } else {
                JoinType::Inner
            };
            for step in edge.steps() {
                alias = self.query.join(&alias, &step, join_type);
            }
        }

        debug!(entity = %node.entity, alias = %alias, joins = self.query.joins().len(), "Joined model");
        Ok(alias)
    }

    /// Project the root identity column followed by each field.
    ///
    /// The projection is replaced, not extended. Joins already on the query
    /// stay, including ones no projected column needs; start from a fresh
    /// builder when earlier joins could multiply rows.
    ///
    /// Every field is resolved before anything is joined, so a failure leaves
    /// the query untouched.
    pub fn add_select(&mut self, fields: &[FieldRef<'_>]) -> Result<()> {
        for field in fields {
            self.tree.node(field.entity)?;
        }

        let root = self.tree.root_entity();
        let mut projection = vec![Column::new(
            self.query.base_alias(),
            root.identity_column(),
        )];
        for field in fields {
            let alias = self.add_joins(field.entity)?;
            projection.push(Column::new(alias, field.field.column()));
        }
        self.query.set_projection(projection);
        Ok(())
    }

    /// The query built so far.
    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    /// Take the finished query.
    pub fn finish(self) -> SelectQuery {
        self.query
    }
}

impl ModelTree {
    /// Start a query fragment builder over this tree.
    pub fn fragment_builder(&self) -> QueryFragmentBuilder<'_> {
        QueryFragmentBuilder::new(self)
    }

    /// Fresh query joined through to `entity`, plus the entity's alias.
    pub fn add_joins<'r>(&self, entity: impl Into<ModelRef<'r>>) -> Result<(SelectQuery, String)> {
        let mut builder = self.fragment_builder();
        let alias = builder.add_joins(entity)?;
        Ok((builder.finish(), alias))
    }

    /// Fresh query projecting the root identity and `fields`.
    pub fn add_select(&self, fields: &[FieldRef<'_>]) -> Result<SelectQuery> {
        let mut builder = self.fragment_builder();
        builder.add_select(fields)?;
        Ok(builder.finish())
    }
}
