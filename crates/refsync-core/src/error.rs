use thiserror::Error as ThisError;

///
/// InconsistentReferenceError
///
/// The entity side of a relation and its holder disagree on identity.
/// Never recovered automatically.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error(
    "inconsistent reference {class}.{field}: entity side has {entity_ids}, holder '{holder}' has {holder_ids}"
)]
pub struct InconsistentReferenceError {
    pub class: &'static str,
    pub field: &'static str,
    pub holder: &'static str,
    pub entity_ids: String,
    pub holder_ids: String,
}

///
/// RegistryError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("registry has already been published")]
    AlreadyPublished,

    #[error("registry has not been published")]
    NotPublished,

    #[error("registry lock poisoned")]
    Poisoned,
}

///
/// IndexError
///

#[derive(Debug, ThisError)]
pub enum IndexError {
    #[error("index on collection '{collection}' has no keys")]
    EmptyKeys { collection: String },

    #[error("failed to create index {index} on collection '{collection}': {source}")]
    Create {
        collection: String,
        index: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
