use crate::prelude::*;

///
/// MethodKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
}

///
/// MethodNode
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MethodNode {
    pub ident: String,

    #[serde(default)]
    pub kind: MethodKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl MethodNode {
    #[must_use]
    pub fn new(ident: &str, params: Vec<TypeRef>) -> Self {
        Self {
            ident: ident.to_string(),
            kind: MethodKind::Method,
            params,
            returns: None,
            is_static: false,
            property: None,
        }
    }

    #[must_use]
    pub fn constructor(ident: &str, params: Vec<TypeRef>) -> Self {
        Self {
            kind: MethodKind::Constructor,
            ..Self::new(ident, params)
        }
    }

    #[must_use]
    pub fn with_returns(mut self, returns: TypeRef) -> Self {
        self.returns = Some(returns);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: &str) -> Self {
        self.property = Some(property.to_string());
        self
    }
}
