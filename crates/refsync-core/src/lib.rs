//! Runtime support for code emitted by `refsync-build`: the lookup capability,
//! reference/holder synchronization, the post-construction check, the
//! process-wide registry, and index creation.

pub mod error;
pub mod index;
pub mod model;
pub mod registry;
pub mod sync;
pub mod traits;
pub mod types;

///
/// Prelude
///
/// Vocabulary used by generated code and by hand-written entity impls.
///

pub mod prelude {
    pub use crate::{
        error::InconsistentReferenceError,
        model::RelationModel,
        traits::{EntityLookup, RefContainer, ReferenceCheck, construct},
        types::ObjectId,
    };
}
