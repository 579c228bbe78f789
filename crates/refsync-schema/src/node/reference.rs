use crate::prelude::*;
use std::collections::BTreeMap;

///
/// ReferenceConfig
///
/// Explicit configuration of how a reference field is stored.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReferenceConfig {
    /// Holder field name override; blank means "use the default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_in: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_mappings: Vec<TypeMapping>,
}

impl ReferenceConfig {
    #[must_use]
    pub fn store_in(name: &str) -> Self {
        Self {
            store_in: Some(name.to_string()),
            type_mappings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, ty: &str, mapped: &str) -> Self {
        self.type_mappings.push(TypeMapping {
            ty: ty.to_string(),
            mapped: mapped.to_string(),
        });
        self
    }

    /// The holder name override, if present and non-blank.
    #[must_use]
    pub fn holder_override(&self) -> Option<&str> {
        self.store_in
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Mappings keyed by abstract type; later duplicates win.
    #[must_use]
    pub fn mapping_table(&self) -> BTreeMap<String, String> {
        self.type_mappings
            .iter()
            .filter(|m| !m.ty.trim().is_empty() && !m.mapped.trim().is_empty())
            .map(|m| (m.ty.clone(), m.mapped.clone()))
            .collect()
    }
}

///
/// TypeMapping
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeMapping {
    pub ty: String,
    pub mapped: String,
}
