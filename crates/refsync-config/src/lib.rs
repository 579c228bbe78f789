//! Resolver configuration for the refsync build pass.
//!
//! Every key is optional; a missing file section falls back to the defaults
//! below, which describe the `refsync` runtime's own base types.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

pub const DEFAULT_ENTITY_BASE: &str = "refsync::EntityBase";
pub const DEFAULT_ENTITY_WITH_ID: &str = "refsync::Entity";
pub const DEFAULT_ROOT_TYPE: &str = "object";
pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_ID_TYPE: &str = "refsync::types::ObjectId";
pub const DEFAULT_HOLDER_SUFFIX: &str = "_id";
pub const DEFAULT_GETTER_PREFIX: &str = "get_";
pub const DEFAULT_RUNTIME_CRATE: &str = "::refsync";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// ResolverConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub entity_base: String,
    pub entity_with_id: String,
    pub root_type: String,
    pub conventional_id: IdConvention,
    pub fallback_id_field: String,
    pub holder_suffix: String,
    pub containers: Vec<ContainerType>,
    pub getter_prefix: String,
    pub runtime_crate: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            entity_base: DEFAULT_ENTITY_BASE.to_string(),
            entity_with_id: DEFAULT_ENTITY_WITH_ID.to_string(),
            root_type: DEFAULT_ROOT_TYPE.to_string(),
            conventional_id: IdConvention::default(),
            fallback_id_field: DEFAULT_ID_FIELD.to_string(),
            holder_suffix: DEFAULT_HOLDER_SUFFIX.to_string(),
            containers: ContainerType::defaults(),
            getter_prefix: DEFAULT_GETTER_PREFIX.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a config from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("entity_base", &self.entity_base),
            ("entity_with_id", &self.entity_with_id),
            ("root_type", &self.root_type),
            ("conventional_id.field", &self.conventional_id.field),
            ("conventional_id.ty", &self.conventional_id.ty),
            ("fallback_id_field", &self.fallback_id_field),
            ("holder_suffix", &self.holder_suffix),
            ("runtime_crate", &self.runtime_crate),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{key}' must not be empty")));
            }
        }

        if self.entity_base == self.entity_with_id {
            return Err(ConfigError::Invalid(format!(
                "'entity_base' and 'entity_with_id' must differ (both are '{}')",
                self.entity_base
            )));
        }

        if let Some(container) = self.containers.iter().find(|c| c.path.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "container path must not be empty (instantiable = {})",
                container.instantiable
            )));
        }

        Ok(())
    }

    /// Look up a configured list-like container by path.
    #[must_use]
    pub fn container(&self, path: &str) -> Option<&ContainerType> {
        self.containers.iter().find(|c| c.path == path)
    }

    #[must_use]
    pub fn is_entity_base(&self, path: &str) -> bool {
        path == self.entity_base || path == self.entity_with_id
    }
}

///
/// IdConvention
/// Identifier guaranteed by the entity-with-id base type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdConvention {
    pub field: String,
    pub ty: String,
}

impl Default for IdConvention {
    fn default() -> Self {
        Self {
            field: DEFAULT_ID_FIELD.to_string(),
            ty: DEFAULT_ID_TYPE.to_string(),
        }
    }
}

///
/// ContainerType
/// A list-like wrapper recognised around entity references.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerType {
    pub path: String,

    #[serde(default = "default_instantiable")]
    pub instantiable: bool,
}

const fn default_instantiable() -> bool {
    true
}

impl ContainerType {
    #[must_use]
    pub fn new(path: &str, instantiable: bool) -> Self {
        Self {
            path: path.to_string(),
            instantiable,
        }
    }

    fn defaults() -> Vec<Self> {
        [
            "Vec",
            "std::vec::Vec",
            "VecDeque",
            "std::collections::VecDeque",
            "LinkedList",
            "std::collections::LinkedList",
        ]
        .into_iter()
        .map(|path| Self::new(path, true))
        .collect()
    }
}
