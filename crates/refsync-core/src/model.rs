use crate::index::IndexDef;

///
/// RelationModel
///
/// Static description of one reference/holder pair, emitted as a constant
/// next to each generated accessor block.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub class: &'static str,
    pub field: &'static str,
    pub holder: &'static str,
    pub target: &'static str,
    pub target_id: &'static str,
    pub wrapped: bool,
}

impl RelationModel {
    #[must_use]
    pub const fn new(
        class: &'static str,
        field: &'static str,
        holder: &'static str,
        target: &'static str,
        target_id: &'static str,
    ) -> Self {
        Self {
            class,
            field,
            holder,
            target,
            target_id,
            wrapped: false,
        }
    }

    #[must_use]
    pub const fn wrapped(mut self) -> Self {
        self.wrapped = true;
        self
    }
}

///
/// EntityEntry
///
/// Catalog entry for one persisted entity class.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EntityEntry {
    pub path: String,
    pub client: Option<String>,
    pub database: Option<String>,
    pub collection: String,
    pub indexes: Vec<IndexDef>,
}

impl EntityEntry {
    #[must_use]
    pub fn new(path: &str, collection: &str) -> Self {
        Self {
            path: path.to_string(),
            collection: collection.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: &str) -> Self {
        self.client = Some(client.to_string());
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }
}
