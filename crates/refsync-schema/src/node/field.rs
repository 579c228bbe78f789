use crate::prelude::*;
use derive_more::{Deref, DerefMut, IntoIterator};

///
/// FieldList
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, IntoIterator, Serialize)]
#[serde(transparent)]
pub struct FieldList {
    #[into_iterator(owned, ref)]
    fields: Vec<FieldNode>,
}

impl FieldList {
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|f| f.ident == ident)
    }
}

impl From<Vec<FieldNode>> for FieldList {
    fn from(fields: Vec<FieldNode>) -> Self {
        Self { fields }
    }
}

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

///
/// FieldNode
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldNode {
    pub ident: String,
    pub ty: TypeRef,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub is_static: bool,

    /// Carries the identifier marker.
    #[serde(default)]
    pub id: bool,

    /// Carries the ignore marker; the field is not persisted.
    #[serde(default)]
    pub ignore: bool,

    /// Persisted property name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceConfig>,
}

impl FieldNode {
    #[must_use]
    pub fn new(ident: &str, ty: TypeRef) -> Self {
        Self {
            ident: ident.to_string(),
            ty,
            visibility: Visibility::default(),
            is_static: false,
            id: false,
            ignore: false,
            property: None,
            reference: None,
        }
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub const fn as_id(mut self) -> Self {
        self.id = true;
        self
    }

    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: &str) -> Self {
        self.property = Some(property.to_string());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceConfig) -> Self {
        self.reference = Some(reference);
        self
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}
