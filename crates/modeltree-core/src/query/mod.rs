//! Query fragments: joins and projections derived from model trees.

mod builder;
mod fragment;

pub use builder::QueryFragmentBuilder;
pub use fragment::{Column, Join, JoinCondition, SelectQuery};
