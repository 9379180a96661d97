//! Hash lookups over a schema source.

use std::collections::HashMap;

use super::{EntityDef, RelationDef, SchemaSource};

/// Entities by lower-cased label and relations by their endpoints.
///
/// Built once per traversal so each hop costs a hash lookup instead of a
/// scan of the whole schema. Relation lists keep declaration order.
pub struct SchemaIndex<'s> {
    entities: HashMap<String, &'s EntityDef>,
    from: HashMap<String, Vec<&'s RelationDef>>,
    to: HashMap<String, Vec<&'s RelationDef>>,
}

impl<'s> SchemaIndex<'s> {
    /// Index every entity and relation of `schema`.
    pub fn new(schema: &'s dyn SchemaSource) -> Self {
        let entities = schema
            .entities()
            .into_iter()
            .map(|entity| (entity.key(), entity))
            .collect();

        let mut from: HashMap<String, Vec<&'s RelationDef>> = HashMap::new();
        let mut to: HashMap<String, Vec<&'s RelationDef>> = HashMap::new();
        for relation in schema.relations() {
            from.entry(relation.from_entity.to_ascii_lowercase())
                .or_default()
                .push(relation);
            to.entry(relation.to_entity.to_ascii_lowercase())
                .or_default()
                .push(relation);
        }

        Self { entities, from, to }
    }

    /// Look up an entity by fully-qualified label (case-insensitive).
    pub fn entity(&self, label: &str) -> Option<&'s EntityDef> {
        self.entities.get(&label.to_ascii_lowercase()).copied()
    }

    /// Relations declared on `label`.
    pub fn relations_from(&self, label: &str) -> &[&'s RelationDef] {
        self.from
            .get(&label.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Relations targeting `label`.
    pub fn relations_to(&self, label: &str) -> &[&'s RelationDef] {
        self.to
            .get(&label.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the schema has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
