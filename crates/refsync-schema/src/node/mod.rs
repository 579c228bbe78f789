mod class;
mod entity;
mod field;
mod index;
mod method;
mod reference;

pub use class::*;
pub use entity::*;
pub use field::*;
pub use index::*;
pub use method::*;
pub use reference::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Debug, ThisError)]
pub enum NodeError {
    #[error("class '{0}' not found in index")]
    ClassNotFound(String),

    #[error("failed to decode class index: {0}")]
    Decode(#[from] serde_json::Error),
}

///
/// ClassIndex
///
/// Queryable, read-only view of every known class keyed by path.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(from = "Vec<ClassNode>", into = "Vec<ClassNode>")]
pub struct ClassIndex {
    classes: BTreeMap<String, ClassNode>,
}

impl ClassIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an index from its JSON form (an array of classes).
    pub fn from_json(source: &str) -> Result<Self, NodeError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn insert(&mut self, class: ClassNode) {
        self.classes.insert(class.path.clone(), class);
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ClassNode> {
        self.classes.get(path)
    }

    pub fn try_get(&self, path: &str) -> Result<&ClassNode, NodeError> {
        self.get(path)
            .ok_or_else(|| NodeError::ClassNotFound(path.to_string()))
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Walk the superclass chain of `path`, nearest ancestor first.
    ///
    /// Stops at `root` or at the first superclass missing from the index.
    pub fn ancestors<'a>(&'a self, path: &str, root: &'a str) -> Ancestors<'a> {
        Ancestors {
            index: self,
            next: self.get(path).and_then(|c| c.superclass.as_deref()),
            root,
            remaining: self.len(),
        }
    }

    /// Every class that transitively extends `base`, excluding `base` itself.
    #[must_use]
    pub fn known_subclasses(&self, base: &str, root: &str) -> Vec<&ClassNode> {
        self.classes()
            .filter(|class| class.path != base)
            .filter(|class| self.superclass_chain_names(&class.path, root).contains(base))
            .collect()
    }

    #[must_use]
    pub fn is_subclass_of(&self, path: &str, base: &str, root: &str) -> bool {
        path != base && self.superclass_chain_names(path, root).contains(base)
    }

    /// Find a field declared by `path` or one of its ancestors, nearest first.
    #[must_use]
    pub fn field_in_chain<'a>(
        &'a self,
        path: &str,
        ident: &str,
        root: &'a str,
    ) -> Option<(&'a ClassNode, &'a FieldNode)> {
        let class = self.get(path)?;

        std::iter::once(class)
            .chain(self.ancestors(path, root))
            .find_map(|c| c.fields.get(ident).map(|f| (c, f)))
    }

    // superclass names, including the first one that is not indexed
    fn superclass_chain_names(&self, path: &str, root: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut current = self.get(path).and_then(|c| c.superclass.clone());

        while let Some(name) = current {
            if name == root || !names.insert(name.clone()) {
                break;
            }
            current = self.get(&name).and_then(|c| c.superclass.clone());
        }

        names
    }
}

impl FromIterator<ClassNode> for ClassIndex {
    fn from_iter<I: IntoIterator<Item = ClassNode>>(iter: I) -> Self {
        let mut index = Self::new();
        for class in iter {
            index.insert(class);
        }

        index
    }
}

impl From<Vec<ClassNode>> for ClassIndex {
    fn from(classes: Vec<ClassNode>) -> Self {
        classes.into_iter().collect()
    }
}

impl From<ClassIndex> for Vec<ClassNode> {
    fn from(index: ClassIndex) -> Self {
        index.classes.into_values().collect()
    }
}

///
/// Ancestors
///

pub struct Ancestors<'a> {
    index: &'a ClassIndex,
    next: Option<&'a str>,
    root: &'a str,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ClassNode;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.next.take()?;
        if path == self.root || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let class = self.index.get(path)?;
        self.next = class.superclass.as_deref();

        Some(class)
    }
}
