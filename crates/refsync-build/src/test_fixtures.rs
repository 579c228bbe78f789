use refsync_config::{ContainerType, ResolverConfig};
use refsync_schema::{
    node::{ClassIndex, ClassKind, ClassNode, FieldNode, ReferenceConfig, Visibility},
    types::TypeRef,
};

pub const ORDER: &str = "app::Order";
pub const CUSTOMER: &str = "app::Customer";
pub const TAG: &str = "app::Tag";

pub fn config() -> ResolverConfig {
    let mut config = ResolverConfig::default();
    config.containers.push(ContainerType::new("Collection", false));

    config
}

pub fn object_id() -> TypeRef {
    TypeRef::class(&config().conventional_id.ty)
}

pub fn customer_ty() -> TypeRef {
    TypeRef::class(CUSTOMER)
}

/// `Customer` inherits the conventional identifier.
pub fn customer() -> ClassNode {
    ClassNode::new(CUSTOMER)
        .with_superclass(&config().entity_with_id)
        .with_field(FieldNode::new("name", TypeRef::class("String")))
}

/// `Tag` declares its own identifier.
pub fn tag() -> ClassNode {
    ClassNode::new(TAG)
        .with_superclass(&config().entity_base)
        .with_field(FieldNode::new("label", TypeRef::class("String")))
        .with_field(FieldNode::new("code", TypeRef::primitive("u32")).as_id())
}

pub fn order() -> ClassNode {
    ClassNode::new(ORDER).with_superclass(&config().entity_with_id)
}

pub fn field(ident: &str, ty: TypeRef) -> FieldNode {
    FieldNode::new(ident, ty)
}

pub fn private(field: FieldNode) -> FieldNode {
    field.with_visibility(Visibility::Private)
}

pub fn stored_in(field: FieldNode, holder: &str) -> FieldNode {
    field.with_reference(ReferenceConfig::store_in(holder))
}

pub fn index(extra: impl IntoIterator<Item = ClassNode>) -> ClassIndex {
    let config = config();

    [
        ClassNode::new(&config.entity_base).with_kind(ClassKind::Abstract),
        ClassNode::new(&config.entity_with_id)
            .with_superclass(&config.entity_base)
            .with_kind(ClassKind::Abstract)
            .with_field(FieldNode::new(&config.conventional_id.field, object_id())),
        ClassNode::new("Collection").with_kind(ClassKind::Interface),
        customer(),
        tag(),
    ]
    .into_iter()
    .chain(extra)
    .collect()
}
