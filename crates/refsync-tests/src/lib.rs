//! Entities whose relation code is generated by the build script from
//! `fixtures/store.json`.

pub mod store {
    use refsync::prelude::*;

    include!(concat!(env!("OUT_DIR"), "/store.rs"));

    /// Lookups resolve every id except [`UNKNOWN`].
    pub const UNKNOWN: u64 = 999;

    #[must_use]
    pub fn oid(n: u64) -> ObjectId {
        ObjectId::from_parts(0, n)
    }

    ///
    /// Customer
    ///

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Customer {
        pub id: Option<ObjectId>,
        pub name: String,
    }

    impl Customer {
        #[must_use]
        pub fn numbered(n: u64) -> Self {
            let id = oid(n);

            Self {
                id: Some(id),
                name: format!("customer {id}"),
            }
        }
    }

    impl EntityBase for Customer {}

    impl Entity for Customer {
        fn id(&self) -> Option<&ObjectId> {
            self.id.as_ref()
        }
    }

    impl EntityLookup<ObjectId> for Customer {
        fn find_by_id(id: &ObjectId) -> Option<Self> {
            (*id != oid(UNKNOWN)).then(|| Self {
                id: Some(*id),
                name: format!("customer {id}"),
            })
        }
    }

    impl Order {
        #[must_use]
        pub fn new(customer: Customer) -> Self {
            Self {
                customer: Some(customer),
                ..Self::default()
            }
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/relations.rs"));
