//! Schema bundle - in-memory snapshot of the entity graph.

use std::collections::HashSet;
use std::path::Path;

use super::{Cardinality, EntityDef, RelationDef, SchemaSource};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A snapshot of every entity and relation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaBundle {
    /// Entity definitions.
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    /// Relation definitions.
    #[serde(default)]
    pub relations: Vec<RelationDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a relation to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Decode and validate a schema from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(json)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Read, decode and validate a schema from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check labels are unique and every relation connects known entities.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.key()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate entity {}",
                    entity.label()
                )));
            }
        }

        for relation in &self.relations {
            for label in [&relation.from_entity, &relation.to_entity] {
                if !seen.contains(&label.to_ascii_lowercase()) {
                    return Err(Error::ModelDoesNotExist(label.clone()));
                }
            }
            if relation.cardinality == Cardinality::OneToMany {
                return Err(Error::InvalidConfig(format!(
                    "relation {}.{} must be declared on the foreign key side",
                    relation.from_entity, relation.name
                )));
            }
        }

        Ok(())
    }
}

impl SchemaSource for SchemaBundle {
    fn entities(&self) -> Vec<&EntityDef> {
        self.entities.iter().collect()
    }

    fn relations(&self) -> Vec<&RelationDef> {
        self.relations.iter().collect()
    }

    fn entity(&self, label: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.has_label(label))
    }
}
