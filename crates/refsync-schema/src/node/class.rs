use crate::prelude::*;

///
/// ClassKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Concrete,
    Abstract,
    Interface,
}

///
/// ClassNode
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClassNode {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub kind: ClassKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityMarker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_for: Option<String>,

    #[serde(default)]
    pub fields: FieldList,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodNode>,
}

impl ClassNode {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            superclass: None,
            interfaces: Vec::new(),
            kind: ClassKind::default(),
            entity: None,
            projection_for: None,
            fields: FieldList::default(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_superclass(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_entity(mut self, marker: EntityMarker) -> Self {
        self.entity = Some(marker);
        self
    }

    #[must_use]
    pub fn with_projection_for(mut self, target: &str) -> Self {
        self.projection_for = Some(target.to_string());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldNode) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodNode) -> Self {
        self.methods.push(method);
        self
    }

    /// Last path segment, used as the default collection name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.path
            .rsplit(['.', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.path)
    }

    #[must_use]
    pub const fn is_instantiable(&self) -> bool {
        matches!(self.kind, ClassKind::Concrete)
    }

    #[must_use]
    pub const fn has_entity_marker(&self) -> bool {
        self.entity.is_some()
    }

    /// True when a method with the same name and parameter types is declared.
    #[must_use]
    pub fn has_method(&self, ident: &str, params: &[TypeRef]) -> bool {
        self.methods
            .iter()
            .any(|m| m.kind == MethodKind::Method && m.ident == ident && m.params == params)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodNode> {
        self.methods
            .iter()
            .filter(|m| m.kind == MethodKind::Constructor)
    }
}
