//! Core error types.

use thiserror::Error;

/// Errors raised while building model trees or resolving references against them.
///
/// These are programmer or configuration errors; none of them is transient.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference does not name any entity known to the schema.
    #[error("model does not exist: {0}")]
    ModelDoesNotExist(String),

    /// The entity exists but is not reachable from the tree's root.
    #[error("model {model} is not related to {root}")]
    ModelNotRelated {
        /// The resolved reference.
        model: String,
        /// Label of the tree's root entity.
        root: String,
    },

    /// A short-name reference matched more than one reachable entity.
    #[error("model {reference} is ambiguous: {}", candidates.join(", "))]
    ModelNotUnique {
        /// The reference as given.
        reference: String,
        /// Labels of every matching entity.
        candidates: Vec<String>,
    },

    /// A tree was requested without a root entity.
    #[error("no root model defined")]
    InvalidRoot,

    /// The entity has no field with that name or column.
    #[error("field does not exist: {entity}.{field}")]
    FieldDoesNotExist {
        /// Label of the entity that was searched.
        entity: String,
        /// Field name as given.
        field: String,
    },

    /// The registry has no tree configured under this key.
    #[error("unknown tree alias: {0}")]
    UnknownAlias(String),

    /// Tree or schema configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration or schema document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or schema document could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for model tree operations.
pub type Result<T> = std::result::Result<T, Error>;
