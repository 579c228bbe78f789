use crate::prelude::*;

///
/// EntityMarker
///
/// Marks a class as persisted. Every override is optional; the collection
/// defaults to the class's simple name.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexSpec>,
}

impl EntityMarker {
    #[must_use]
    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    /// Resolve the collection name for the class carrying this marker.
    #[must_use]
    pub fn resolved_collection<'a>(&'a self, class: &'a ClassNode) -> &'a str {
        self.collection
            .as_deref()
            .unwrap_or_else(|| class.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_defaults_to_simple_name() {
        let class = ClassNode::new("app::model::Customer");

        assert_eq!(EntityMarker::default().resolved_collection(&class), "Customer");
        assert_eq!(
            EntityMarker::default()
                .with_collection("customers")
                .resolved_collection(&class),
            "customers"
        );
    }
}
