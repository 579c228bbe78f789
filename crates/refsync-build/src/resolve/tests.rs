use super::*;
use crate::test_fixtures::*;
use refsync_schema::node::ReferenceConfig;

fn resolve(order: ClassNode) -> Result<Vec<FieldKind>, BuildError> {
    let index = index([order]);
    let config = config();
    let class = index.get(ORDER).unwrap();

    ReferenceFieldResolver::new(&index, &config).resolve_class(class)
}

fn names(kinds: &[FieldKind]) -> Vec<&str> {
    kinds.iter().map(FieldKind::name).collect()
}

#[test]
fn single_reference_gets_conventional_holder() {
    let kinds = resolve(order().with_field(field("customer", customer_ty()))).unwrap();

    assert_eq!(names(&kinds), vec!["customer", "customer_id"]);
    let reference = kinds[0].as_referenced().unwrap();
    assert_eq!(reference.holder_ty, object_id());
    assert_eq!(reference.target_id_field, "id");
    assert!(!reference.container_wrapped);
    assert!(!reference.holder_already_declared);

    let holder = kinds[1].as_holder().unwrap();
    assert_eq!(holder.owner_name, "customer");
    assert_eq!(holder.ty, object_id());
}

#[test]
fn holder_override_is_used() {
    let kinds = resolve(
        order().with_field(stored_in(field("customer", customer_ty()), "buyer")),
    )
    .unwrap();

    assert_eq!(names(&kinds), vec!["customer", "buyer"]);
}

#[test]
fn blank_override_falls_back_to_suffix() {
    let kinds =
        resolve(order().with_field(stored_in(field("customer", customer_ty()), "  "))).unwrap();

    assert_eq!(names(&kinds), vec!["customer", "customer_id"]);
}

#[test]
fn non_entities_and_skipped_fields_stay_out() {
    let kinds = resolve(
        order()
            .with_field(field("note", TypeRef::class("String")))
            .with_field(field("total", TypeRef::primitive("i64")))
            .with_field(field("cache", customer_ty()).ignored())
            .with_field(field("DEFAULT", customer_ty()).as_static())
            .with_field(field(
                "lookup",
                TypeRef::parameterized("BTreeMap", vec![TypeRef::class("String"), customer_ty()]),
            )),
    )
    .unwrap();

    assert_eq!(names(&kinds), vec!["note", "total", "lookup"]);
    assert!(kinds.iter().all(|k| matches!(k, FieldKind::Plain { .. })));
}

#[test]
fn target_id_is_first_marked_field() {
    let kinds = resolve(order().with_field(field("tag", TypeRef::class(TAG)))).unwrap();
    let reference = kinds[0].as_referenced().unwrap();

    assert_eq!(reference.target_id_field, "code");
    assert_eq!(reference.holder_ty, TypeRef::primitive("u32"));
}

#[test]
fn target_id_falls_back_to_literal_id() {
    let target = ClassNode::new("app::Note")
        .with_superclass(&config().entity_base)
        .with_field(field("id", TypeRef::primitive("u64")));
    let index = index([
        target,
        order().with_field(field("note", TypeRef::class("app::Note"))),
    ]);
    let config = config();

    let kinds = ReferenceFieldResolver::new(&index, &config)
        .resolve_class(index.get(ORDER).unwrap())
        .unwrap();
    assert_eq!(
        kinds[0].as_referenced().unwrap().holder_ty,
        TypeRef::primitive("u64")
    );
}

#[test]
fn missing_target_id_fails() {
    let target = ClassNode::new("app::Note")
        .with_superclass(&config().entity_base)
        .with_field(field("body", TypeRef::class("String")));
    let index = index([
        target,
        order().with_field(field("note", TypeRef::class("app::Note"))),
    ]);
    let config = config();

    let err = ReferenceFieldResolver::new(&index, &config)
        .resolve_class(index.get(ORDER).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::MissingIdField { field, target, .. } if field == "note" && target == "app::Note"
    ));
}

#[test]
fn list_reference_wraps_holder() {
    let kinds = resolve(
        order().with_field(field("customers", TypeRef::generic("Vec", customer_ty()))),
    )
    .unwrap();
    let reference = kinds[0].as_referenced().unwrap();

    assert!(reference.container_wrapped);
    assert_eq!(reference.holder_name, "customers_id");
    assert_eq!(reference.holder_ty, TypeRef::generic("Vec", object_id()));
    assert_eq!(reference.holder_init, Some(TypeRef::generic("Vec", object_id())));
}

#[test]
fn array_reference_is_not_lazily_initialized() {
    let kinds = resolve(order().with_field(field("pair", TypeRef::array(customer_ty())))).unwrap();
    let reference = kinds[0].as_referenced().unwrap();

    assert_eq!(reference.holder_ty, TypeRef::array(object_id()));
    assert_eq!(reference.holder_init, None);
}

#[test]
fn abstract_container_needs_mapping() {
    let ty = TypeRef::generic("Collection", customer_ty());

    let err = resolve(order().with_field(field("customers", ty.clone()))).unwrap_err();
    assert!(matches!(
        err,
        BuildError::TypeMappingRequired { container, .. } if container == "Collection"
    ));

    let mapped = field("customers", ty)
        .with_reference(ReferenceConfig::default().with_mapping("Collection", "Vec"));
    let kinds = resolve(order().with_field(mapped)).unwrap();
    let reference = kinds[0].as_referenced().unwrap();

    assert_eq!(reference.holder_ty, TypeRef::generic("Vec", object_id()));
    assert_eq!(
        reference.type_mappings.get("Collection").map(String::as_str),
        Some("Vec")
    );
}

#[test]
fn nested_wrapping_is_unsupported() {
    let ty = TypeRef::generic("Vec", TypeRef::generic("Vec", customer_ty()));
    let err = resolve(order().with_field(field("groups", ty))).unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedGenericShape { field, .. } if field == "groups"));
}

#[test]
fn unsupported_shape_with_marker_fails() {
    let ty = TypeRef::parameterized("BTreeMap", vec![TypeRef::class("String"), customer_ty()]);
    let err = resolve(order().with_field(stored_in(field("lookup", ty), "lookup_ids"))).unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedGenericShape { .. }));
}

#[test]
fn declared_holder_keeps_its_position() {
    let kinds = resolve(
        order()
            .with_field(field("customer_id", object_id()))
            .with_field(field("note", TypeRef::class("String")))
            .with_field(field("customer", customer_ty())),
    )
    .unwrap();

    assert_eq!(names(&kinds), vec!["customer_id", "note", "customer"]);
    assert!(kinds[2].as_referenced().unwrap().holder_already_declared);
}

#[test]
fn declared_holder_after_reference_is_bound() {
    let kinds = resolve(
        order()
            .with_field(field("customer", customer_ty()))
            .with_field(field("customer_id", object_id())),
    )
    .unwrap();

    assert_eq!(names(&kinds), vec!["customer", "customer_id"]);
    assert!(kinds[1].as_holder().is_some());
}

#[test]
fn declared_holder_with_unmapped_container_is_compatible() {
    let ty = TypeRef::generic("Collection", customer_ty());
    let reference = field("customers", ty)
        .with_reference(ReferenceConfig::default().with_mapping("Collection", "Vec"));
    let declared = field("customers_id", TypeRef::generic("Collection", object_id()));

    let kinds = resolve(order().with_field(reference).with_field(declared)).unwrap();
    assert_eq!(
        kinds[0].as_referenced().unwrap().holder_ty,
        TypeRef::generic("Collection", object_id())
    );
}

#[test]
fn incompatible_declared_holder_collides() {
    let err = resolve(
        order()
            .with_field(field("customer", customer_ty()))
            .with_field(field("customer_id", TypeRef::class("String"))),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BuildError::NameCollision { holder, reason, .. }
            if holder == "customer_id" && reason.contains("String")
    ));
}

#[test]
fn ignored_declared_holder_collides() {
    let err = resolve(
        order()
            .with_field(field("customer", customer_ty()))
            .with_field(field("customer_id", object_id()).ignored()),
    )
    .unwrap_err();

    assert!(matches!(err, BuildError::NameCollision { .. }));
}

#[test]
fn shared_holder_name_collides() {
    let err = resolve(
        order()
            .with_field(stored_in(field("buyer", customer_ty()), "party_id"))
            .with_field(stored_in(
                field("labels", TypeRef::generic("Vec", TypeRef::class(TAG))),
                "party_id",
            )),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BuildError::NameCollision { field, holder, .. } if field == "labels" && holder == "party_id"
    ));
}

#[test]
fn holder_naming_another_reference_collides() {
    let err = resolve(
        order()
            .with_field(stored_in(field("buyer", customer_ty()), "seller"))
            .with_field(field("seller", customer_ty())),
    )
    .unwrap_err();

    assert!(matches!(err, BuildError::NameCollision { field, .. } if field == "buyer"));
}

#[test]
fn private_fields_are_resolved() {
    let kinds = resolve(order().with_field(private(field("customer", customer_ty())))).unwrap();

    assert_eq!(names(&kinds), vec!["customer", "customer_id"]);
}
