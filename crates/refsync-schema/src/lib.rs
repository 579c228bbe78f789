//! Read-only metadata view of the classes the refsync build pass analyzes.
//!
//! The view is produced by an external index scanner; this crate only models
//! it, loads it, and runs the structural checks that precede resolution.

pub mod error;
pub mod node;
pub mod types;
pub mod validate;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        types::{IndexDirection, TypeRef},
    };
    pub use serde::{Deserialize, Serialize};
}
