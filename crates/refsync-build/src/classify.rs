//! EntityClassifier: decides whether a core type is a persisted entity.

use refsync_config::ResolverConfig;
use refsync_schema::node::{ClassIndex, ClassNode};

///
/// Classification
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Classification {
    NotEntity,

    /// Entity that locates its own identifier field.
    EntityBase,

    /// Entity carrying the conventional identifier.
    EntityWithId,
}

impl Classification {
    #[must_use]
    pub const fn is_entity(self) -> bool {
        !matches!(self, Self::NotEntity)
    }

    #[must_use]
    pub const fn has_predefined_id(self) -> bool {
        matches!(self, Self::EntityWithId)
    }
}

///
/// EntityClassifier
///
/// Only the immediate superclass is inspected; deeper hierarchies count as
/// entities through the marker alone.
///

#[derive(Clone, Copy, Debug)]
pub struct EntityClassifier<'a> {
    index: &'a ClassIndex,
    config: &'a ResolverConfig,
}

impl<'a> EntityClassifier<'a> {
    #[must_use]
    pub const fn new(index: &'a ClassIndex, config: &'a ResolverConfig) -> Self {
        Self { index, config }
    }

    /// Classify a class by path; classes missing from the index are never
    /// entities.
    #[must_use]
    pub fn classify(&self, path: &str) -> Classification {
        self.index
            .get(path)
            .map_or(Classification::NotEntity, |class| self.classify_node(class))
    }

    #[must_use]
    pub fn classify_node(&self, class: &ClassNode) -> Classification {
        match class.superclass.as_deref() {
            Some(sup) if sup == self.config.entity_with_id => Classification::EntityWithId,
            Some(sup) if sup == self.config.entity_base => Classification::EntityBase,
            _ if class.has_entity_marker() => Classification::EntityBase,
            _ => Classification::NotEntity,
        }
    }
}
