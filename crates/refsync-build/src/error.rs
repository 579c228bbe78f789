use refsync_config::ConfigError;
use refsync_schema::{error::ErrorTree, node::NodeError};
use thiserror::Error as ThisError;

///
/// BuildError
///
/// Every variant is fatal; nothing is emitted once one is raised.
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("{class}.{field}: holder name '{holder}' collides: {reason}")]
    NameCollision {
        class: String,
        field: String,
        holder: String,
        reason: String,
    },

    #[error("{class}.{field}: referenced entity '{target}' has no identifier field")]
    MissingIdField {
        class: String,
        field: String,
        target: String,
    },

    #[error("{class}.{field}: unsupported reference shape '{ty}'")]
    UnsupportedGenericShape {
        class: String,
        field: String,
        ty: String,
    },

    #[error(
        "{class}.{field}: container '{container}' cannot be instantiated and needs an explicit type mapping"
    )]
    TypeMappingRequired {
        class: String,
        field: String,
        container: String,
    },

    #[error(
        "{class}.{field}: identifier marker is not allowed, the entity base already provides one"
    )]
    DuplicateIdentifierAnnotation { class: String, field: String },

    #[error("class '{0}' not found")]
    ClassNotFound(String),

    #[error("{class}.{field}: accessor refers to a relation that was not planned")]
    MissingRelation { class: String, field: String },

    #[error("invalid path or identifier '{0}' in generated code")]
    InvalidPath(String),

    #[error("validation failed: {0}")]
    Validation(ErrorTree),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Node(#[from] NodeError),
}

impl BuildError {
    pub(crate) fn name_collision(
        class: &str,
        field: &str,
        holder: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::NameCollision {
            class: class.to_string(),
            field: field.to_string(),
            holder: holder.to_string(),
            reason: reason.into(),
        }
    }
}
