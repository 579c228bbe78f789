//! Entity catalog consumed by index creation.

use refsync_schema::node::{ClassNode, IndexSpec};
use serde::Serialize;

///
/// CatalogEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub path: String,
    pub client: Option<String>,
    pub database: Option<String>,
    pub collection: String,
    pub indexes: Vec<IndexSpec>,
}

impl CatalogEntry {
    #[must_use]
    pub fn from_class(class: &ClassNode) -> Self {
        match &class.entity {
            Some(marker) => Self {
                path: class.path.clone(),
                client: marker.client.clone(),
                database: marker.database.clone(),
                collection: marker.resolved_collection(class).to_string(),
                indexes: marker.indexes.clone(),
            },
            None => Self {
                path: class.path.clone(),
                client: None,
                database: None,
                collection: class.simple_name().to_string(),
                indexes: Vec::new(),
            },
        }
    }
}

#[must_use]
pub fn build_catalog(entities: &[&ClassNode]) -> Vec<CatalogEntry> {
    entities.iter().map(|class| CatalogEntry::from_class(class)).collect()
}
