//! Schema catalog consumed by tree building.
//!
//! The catalog describes entities, their fields, and the relations declared between them.

mod entity;
mod field;
mod index;
mod relation;
mod schema;
mod source;

pub use entity::EntityDef;
pub use field::{FieldDef, ScalarType};
pub use index::SchemaIndex;
pub use relation::{Cardinality, RelationDef, Through, HIDDEN_REVERSE};
pub use schema::SchemaBundle;
pub use source::SchemaSource;
