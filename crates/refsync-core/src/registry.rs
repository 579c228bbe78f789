//! Process-wide registry of build-time data.
//!
//! The registry is built in full by the generated bootstrap function, then
//! published once. Readers take an `Arc` snapshot; nothing mutates it in place.

use crate::{error::RegistryError, model::EntityEntry};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};
use tracing::info;

static REGISTRY: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

///
/// Registry
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registry {
    replacements: BTreeMap<String, BTreeMap<String, String>>,
    entities: Vec<EntityEntry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `property -> persisted` renames for `class`.
    #[must_use]
    pub fn with_replacements(mut self, class: &str, pairs: &[(&str, &str)]) -> Self {
        let map = self.replacements.entry(class.to_string()).or_default();
        for (property, persisted) in pairs {
            map.insert((*property).to_string(), (*persisted).to_string());
        }

        self
    }

    #[must_use]
    pub fn with_entity(mut self, entry: EntityEntry) -> Self {
        self.entities.push(entry);
        self
    }

    /// Persisted name for `property` on `class`; unknown names pass through.
    #[must_use]
    pub fn replace_property<'a>(&'a self, class: &str, property: &'a str) -> &'a str {
        self.replacements
            .get(class)
            .and_then(|map| map.get(property))
            .map_or(property, String::as_str)
    }

    #[must_use]
    pub fn replacements(&self, class: &str) -> Option<&BTreeMap<String, String>> {
        self.replacements.get(class)
    }

    #[must_use]
    pub fn entities(&self) -> &[EntityEntry] {
        &self.entities
    }

    pub fn entity_classes(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.path.as_str())
    }
}

/// Publish `registry` as the process-wide snapshot. Only one publish is allowed
/// until [`teardown`].
pub fn publish(registry: Registry) -> Result<Arc<Registry>, RegistryError> {
    let mut slot = REGISTRY.write().map_err(|_| RegistryError::Poisoned)?;
    if slot.is_some() {
        return Err(RegistryError::AlreadyPublished);
    }

    let registry = Arc::new(registry);
    *slot = Some(Arc::clone(&registry));

    info!(
        entities = registry.entities.len(),
        classes = registry.replacements.len(),
        "registry published"
    );

    Ok(registry)
}

pub fn snapshot() -> Result<Arc<Registry>, RegistryError> {
    REGISTRY
        .read()
        .map_err(|_| RegistryError::Poisoned)?
        .clone()
        .ok_or(RegistryError::NotPublished)
}

#[must_use]
pub fn is_published() -> bool {
    REGISTRY.read().is_ok_and(|slot| slot.is_some())
}

pub fn replace_property(class: &str, property: &str) -> Result<String, RegistryError> {
    Ok(snapshot()?.replace_property(class, property).to_string())
}

pub fn entity_classes() -> Result<Vec<String>, RegistryError> {
    Ok(snapshot()?.entity_classes().map(str::to_string).collect())
}

/// Drop the published snapshot. Outstanding `Arc`s stay valid.
pub fn teardown() -> Result<(), RegistryError> {
    REGISTRY
        .write()
        .map_err(|_| RegistryError::Poisoned)?
        .take();

    Ok(())
}
