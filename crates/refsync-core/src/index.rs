//! Index creation for the registered entity catalog.
//!
//! The database driver is a collaborator behind [`IndexCreator`]; this module
//! only decides which calls to issue and with which options.

use crate::{error::IndexError, model::EntityEntry, registry};
use derive_more::Display;
use tracing::info;

///
/// IndexDirection
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum IndexDirection {
    #[default]
    #[display("1")]
    Asc,

    #[display("-1")]
    Desc,
}

///
/// IndexKey
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexKey {
    pub field: String,
    pub direction: IndexDirection,
}

impl IndexKey {
    #[must_use]
    pub fn new(field: &str, direction: IndexDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

///
/// IndexDef
///
/// One declared index, as recorded in the entity catalog.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexDef {
    pub keys: Vec<IndexKey>,
    pub background: bool,
    pub unique: bool,
    pub name: String,
    pub sparse: bool,
    pub expire_after_seconds: i64,
    pub hidden: bool,
}

impl IndexDef {
    #[must_use]
    pub fn on(keys: &[(&str, IndexDirection)]) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|(field, direction)| IndexKey::new(field, *direction))
                .collect(),
            ..Self::default()
        }
    }

    /// Driver options, dropping the ones left at their "unset" value.
    #[must_use]
    pub fn options(&self) -> CreateOptions {
        CreateOptions {
            background: self.background,
            unique: self.unique,
            name: (!self.name.is_empty()).then(|| self.name.clone()),
            sparse: self.sparse,
            expire_after_seconds: u64::try_from(self.expire_after_seconds)
                .ok()
                .filter(|secs| *secs > 0),
            hidden: self.hidden,
        }
    }
}

///
/// IndexKeys
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexKeys<'a> {
    Single(&'a IndexKey),
    Compound(&'a [IndexKey]),
}

impl<'a> IndexKeys<'a> {
    fn from_def(def: &'a IndexDef) -> Option<Self> {
        match def.keys.as_slice() {
            [] => None,
            [key] => Some(Self::Single(key)),
            keys => Some(Self::Compound(keys)),
        }
    }
}

///
/// CreateOptions
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateOptions {
    pub background: bool,
    pub unique: bool,
    pub name: Option<String>,
    pub sparse: bool,
    pub expire_after_seconds: Option<u64>,
    pub hidden: bool,
}

///
/// IndexCreator
///

pub trait IndexCreator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_index(
        &mut self,
        entity: &EntityEntry,
        keys: IndexKeys<'_>,
        options: &CreateOptions,
    ) -> Result<(), Self::Error>;
}

/// Issue one create-index call per declared index of every entity.
///
/// Returns the number of indexes created.
pub fn ensure_indexes<C: IndexCreator>(
    creator: &mut C,
    entities: &[EntityEntry],
) -> Result<usize, IndexError> {
    let mut created = 0;

    for entity in entities {
        for def in &entity.indexes {
            let keys = IndexKeys::from_def(def).ok_or_else(|| IndexError::EmptyKeys {
                collection: entity.collection.clone(),
            })?;

            creator
                .create_index(entity, keys, &def.options())
                .map_err(|e| IndexError::Create {
                    collection: entity.collection.clone(),
                    index: describe(def),
                    source: Box::new(e),
                })?;
            created += 1;
        }
    }

    info!(created, entities = entities.len(), "indexes ensured");

    Ok(created)
}

/// Ensure the indexes of every entity in the published registry.
pub fn ensure_registered_indexes<C: IndexCreator>(creator: &mut C) -> Result<usize, IndexError> {
    let snapshot = registry::snapshot()?;

    ensure_indexes(creator, snapshot.entities())
}

fn describe(def: &IndexDef) -> String {
    let keys = def
        .keys
        .iter()
        .map(|k| format!("{}: {}", k.field, k.direction))
        .collect::<Vec<_>>();

    format!("{{{}}}", keys.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, String, CreateOptions)>,
    }

    impl IndexCreator for Recorder {
        type Error = Infallible;

        fn create_index(
            &mut self,
            entity: &EntityEntry,
            keys: IndexKeys<'_>,
            options: &CreateOptions,
        ) -> Result<(), Self::Error> {
            let keys = match keys {
                IndexKeys::Single(key) => format!("single {}", key.field),
                IndexKeys::Compound(keys) => format!("compound {}", keys.len()),
            };
            self.calls
                .push((entity.collection.clone(), keys, options.clone()));

            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("driver down")]
    struct DriverDown;

    struct Failing;

    impl IndexCreator for Failing {
        type Error = DriverDown;

        fn create_index(
            &mut self,
            _: &EntityEntry,
            _: IndexKeys<'_>,
            _: &CreateOptions,
        ) -> Result<(), Self::Error> {
            Err(DriverDown)
        }
    }

    fn customer() -> EntityEntry {
        let mut ttl = IndexDef::on(&[("seen", IndexDirection::Desc)]);
        ttl.expire_after_seconds = 3600;
        ttl.name = "seen_ttl".to_string();

        let mut compound = IndexDef::on(&[
            ("last_name", IndexDirection::Asc),
            ("first_name", IndexDirection::Asc),
        ]);
        compound.unique = true;
        compound.expire_after_seconds = -1;

        EntityEntry::new("app::Customer", "customers")
            .with_index(ttl)
            .with_index(compound)
    }

    #[test]
    fn one_call_per_index() {
        let mut recorder = Recorder::default();
        let created = ensure_indexes(&mut recorder, &[customer()]).unwrap();

        assert_eq!(created, 2);
        assert_eq!(recorder.calls[0].0, "customers");
        assert_eq!(recorder.calls[0].1, "single seen");
        assert_eq!(recorder.calls[1].1, "compound 2");
    }

    #[test]
    fn unset_options_are_dropped() {
        let mut recorder = Recorder::default();
        ensure_indexes(&mut recorder, &[customer()]).unwrap();

        let ttl = &recorder.calls[0].2;
        assert_eq!(ttl.name.as_deref(), Some("seen_ttl"));
        assert_eq!(ttl.expire_after_seconds, Some(3600));

        let compound = &recorder.calls[1].2;
        assert!(compound.unique);
        assert_eq!(compound.name, None);
        assert_eq!(compound.expire_after_seconds, None);
    }

    #[test]
    fn empty_keys_fail() {
        let entity = EntityEntry::new("app::Tag", "tags").with_index(IndexDef::default());
        let err = ensure_indexes(&mut Recorder::default(), &[entity]).unwrap_err();

        assert!(matches!(err, IndexError::EmptyKeys { collection } if collection == "tags"));
    }

    #[test]
    fn driver_errors_name_the_index() {
        let err = ensure_indexes(&mut Failing, &[customer()]).unwrap_err();

        assert!(err.to_string().contains("{seen: -1}"));
        assert!(matches!(err, IndexError::Create { .. }));
    }
}
