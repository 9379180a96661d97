//! Capability interface over schema metadata.

use super::{EntityDef, RelationDef};

/// Read-only access to entity and relation metadata.
///
/// Implementations must return entities and relations in a stable declaration
/// order; tree building relies on it for deterministic tie-breaking.
pub trait SchemaSource: Send + Sync {
    /// All entities, in declaration order.
    fn entities(&self) -> Vec<&EntityDef>;

    /// All declared relations, in declaration order.
    fn relations(&self) -> Vec<&RelationDef>;

    /// Look up an entity by fully-qualified label (case-insensitive).
    fn entity(&self, label: &str) -> Option<&EntityDef> {
        self.entities().into_iter().find(|e| e.has_label(label))
    }

    /// Relations declared on `label`.
    fn relations_from(&self, label: &str) -> Vec<&RelationDef> {
        self.relations()
            .into_iter()
            .filter(|r| r.is_from(label))
            .collect()
    }

    /// Relations declared elsewhere (or on `label` itself) that target `label`.
    fn relations_to(&self, label: &str) -> Vec<&RelationDef> {
        self.relations()
            .into_iter()
            .filter(|r| r.is_to(label))
            .collect()
    }
}
