use super::*;
use proptest::prelude::*;
use std::collections::VecDeque;
use test_log::test;

const MISSING_FROM: u32 = 1000;

const ORDER_CUSTOMER: RelationModel = RelationModel::new(
    "app::Order",
    "customer",
    "customer_id",
    "app::Customer",
    "id",
);
const ORDER_ITEMS: RelationModel =
    RelationModel::new("app::Order", "items", "items_id", "app::Customer", "id").wrapped();

#[derive(Clone, Debug, PartialEq)]
struct Customer {
    id: Option<u32>,
}

impl Customer {
    const fn new(id: u32) -> Self {
        Self { id: Some(id) }
    }
}

// ids at or above MISSING_FROM are never stored
impl EntityLookup<u32> for Customer {
    fn find_by_id(id: &u32) -> Option<Self> {
        (*id < MISSING_FROM).then(|| Self::new(*id))
    }
}

fn id_of(customer: &Customer) -> Option<u32> {
    customer.id
}

///
/// SINGLE
///

#[test]
fn setting_entity_copies_identifier() {
    let (mut entity, mut holder) = (None, None);
    set_entity(&ORDER_CUSTOMER, &mut entity, &mut holder, Some(Customer::new(7)), id_of);

    assert_eq!(holder, Some(7));
    assert_eq!(entity, Some(Customer::new(7)));

    set_entity(&ORDER_CUSTOMER, &mut entity, &mut holder, None, id_of);
    assert_eq!(holder, None);
    assert_eq!(entity, None);
}

#[test]
fn setting_holder_resolves_entity() {
    let (mut entity, mut holder) = (None::<Customer>, None);
    set_holder(&ORDER_CUSTOMER, &mut entity, &mut holder, Some(7u32));

    assert_eq!(entity, Some(Customer::new(7)));
    assert_eq!(holder, Some(7));
}

#[test]
fn setting_unresolvable_holder_leaves_entity_unset() {
    let (mut entity, mut holder) = (Some(Customer::new(1)), None);
    set_holder(&ORDER_CUSTOMER, &mut entity, &mut holder, Some(MISSING_FROM));

    assert_eq!(entity, None);
    assert_eq!(holder, Some(MISSING_FROM));
}

#[test]
fn validate_with_both_sides_unset_is_noop() {
    let (mut entity, mut holder) = (None::<Customer>, None::<u32>);
    validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).unwrap();

    assert_eq!((entity, holder), (None, None));
}

#[test]
fn validate_derives_entity_from_holder() {
    let (mut entity, mut holder) = (None, Some(3));
    validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).unwrap();

    assert_eq!(entity, Some(Customer::new(3)));
}

#[test]
fn validate_derives_holder_from_entity() {
    let (mut entity, mut holder) = (Some(Customer::new(4)), None);
    validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).unwrap();

    assert_eq!(holder, Some(4));
}

#[test]
fn validate_with_matching_sides_is_idempotent() {
    let (mut entity, mut holder) = (Some(Customer::new(5)), Some(5));

    for _ in 0..3 {
        validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).unwrap();
        assert_eq!(entity, Some(Customer::new(5)));
        assert_eq!(holder, Some(5));
    }
}

#[test]
fn validate_with_disagreeing_sides_fails() {
    let (mut entity, mut holder) = (Some(Customer::new(5)), Some(6));
    let err = validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).unwrap_err();

    assert_eq!(err.class, "app::Order");
    assert_eq!(err.field, "customer");
    assert_eq!(err.holder, "customer_id");
    assert_eq!(err.entity_ids, "Some(5)");
    assert_eq!(err.holder_ids, "6");
}

#[test]
fn validate_with_unidentified_entity_and_set_holder_fails() {
    let (mut entity, mut holder) = (Some(Customer { id: None }), Some(6));

    assert!(validate_single(&ORDER_CUSTOMER, &mut entity, &mut holder, id_of).is_err());
}

///
/// WRAPPED
///

#[test]
fn setting_entities_rebuilds_holder_in_order() {
    let mut entities: Option<Vec<Customer>> = None;
    let mut holders: Option<Vec<u32>> = Some(vec![9, 9]);
    let value = vec![Customer::new(1), Customer::new(2), Customer::new(3)];

    set_entities(&ORDER_ITEMS, &mut entities, &mut holders, Some(value), id_of);

    assert_eq!(holders, Some(vec![1, 2, 3]));
    assert_eq!(entities.as_ref().map(Vec::len), Some(3));
}

#[test]
fn setting_holders_resolves_in_order() {
    let mut entities: Option<VecDeque<Customer>> = None;
    let mut holders: Option<Box<[u32]>> = None;

    set_holders(
        &ORDER_ITEMS,
        &mut entities,
        &mut holders,
        Some(vec![1, 2, 3].into_boxed_slice()),
    );

    let entities = entities.unwrap();
    assert_eq!(
        entities.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![Some(1), Some(2), Some(3)]
    );
}

#[test]
fn setting_holders_skips_unresolvable_ids() {
    let mut entities: Option<Vec<Customer>> = None;
    let mut holders: Option<Vec<u32>> = None;

    set_holders(
        &ORDER_ITEMS,
        &mut entities,
        &mut holders,
        Some(vec![1, MISSING_FROM, 3]),
    );

    assert_eq!(entities, Some(vec![Customer::new(1), Customer::new(3)]));
    assert_eq!(holders, Some(vec![1, MISSING_FROM, 3]));
}

#[test]
fn validation_after_setting_holders_with_missing_id_succeeds() {
    let mut entities: Option<Vec<Customer>> = None;
    let mut holders: Option<Vec<u32>> = None;

    set_holders(
        &ORDER_ITEMS,
        &mut entities,
        &mut holders,
        Some(vec![1, MISSING_FROM, 3]),
    );
    validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap();

    assert_eq!(entities, Some(vec![Customer::new(1), Customer::new(3)]));
    assert_eq!(holders, Some(vec![1, MISSING_FROM, 3]));
}

#[test]
fn validate_many_rejects_resolvable_id_without_entity() {
    let mut entities = Some(vec![Customer::new(1), Customer::new(3)]);
    let mut holders = Some(vec![1, 2, 3]);

    let err = validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap_err();
    assert_eq!(err.holder_ids, "[1, 2, 3]");

    let mut entities = Some(vec![Customer::new(1), Customer::new(3)]);
    let mut holders = Some(vec![1, MISSING_FROM]);

    assert!(validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).is_err());
}

#[test]
fn validate_many_treats_empty_as_unset() {
    let mut entities: Option<Vec<Customer>> = Some(Vec::new());
    let mut holders: Option<Vec<u32>> = Some(vec![2, 1]);

    validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap();
    assert_eq!(entities, Some(vec![Customer::new(2), Customer::new(1)]));

    let mut entities = Some(vec![Customer::new(4)]);
    let mut holders: Option<Vec<u32>> = None;

    validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap();
    assert_eq!(holders, Some(vec![4]));
}

#[test]
fn validate_many_with_matching_sides_is_idempotent() {
    let mut entities = Some(vec![Customer::new(1), Customer::new(2)]);
    let mut holders = Some(vec![1, 2]);

    for _ in 0..2 {
        validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap();
    }
    assert_eq!(holders, Some(vec![1, 2]));
}

#[test]
fn validate_many_rejects_reordered_or_short_holders() {
    let mut entities = Some(vec![Customer::new(1), Customer::new(2)]);
    let mut holders = Some(vec![2, 1]);
    assert!(validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).is_err());

    let mut holders = Some(vec![1]);
    let err = validate_many(&ORDER_ITEMS, &mut entities, &mut holders, id_of).unwrap_err();
    assert_eq!(err.holder_ids, "[1]");
}

#[test]
fn init_holder_only_fills_unset() {
    let mut holder: Option<Vec<u32>> = None;
    init_holder(&mut holder);
    assert_eq!(holder, Some(Vec::new()));

    let mut holder = Some(vec![1]);
    init_holder(&mut holder);
    assert_eq!(holder, Some(vec![1]));
}

proptest! {
    #[test]
    fn wrapped_sync_preserves_order(ids in prop::collection::vec(0u32..MISSING_FROM, 0..16)) {
        let customers = ids.iter().copied().map(Customer::new).collect::<Vec<_>>();

        let mut entities: Option<Vec<Customer>> = None;
        let mut holders: Option<Vec<u32>> = None;
        set_entities(&ORDER_ITEMS, &mut entities, &mut holders, Some(customers.clone()), id_of);
        prop_assert_eq!(holders.clone(), Some(ids.clone()));

        let mut resolved: Option<Vec<Customer>> = None;
        set_holders(&ORDER_ITEMS, &mut resolved, &mut holders, Some(ids));
        prop_assert_eq!(resolved, Some(customers));
    }
}
