//! ## Crate layout
//! - `build`: reference resolution and accessor generation, run from build scripts.
//! - `config`: resolver configuration loaded from TOML.
//! - `schema`: the class metadata view the build pass reads.
//! - `error`, `index`, `model`, `registry`, `sync`, `traits`, `types`: the
//!   runtime surface named by generated code.
//!
//! Generated code refers to this crate as `::refsync` unless the build is
//! configured otherwise.

pub use refsync_build as build;
pub use refsync_config as config;
pub use refsync_schema as schema;

pub use refsync_core::{error, index, model, registry, sync, traits, types};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// EntityBase
///
/// Base of every persisted type that locates its own identifier field.
///

pub trait EntityBase {}

///
/// Entity
///
/// Entities carrying the conventional `id` field.
///

pub trait Entity: EntityBase {
    fn id(&self) -> Option<&types::ObjectId>;
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Entity, EntityBase};
    pub use refsync_core::prelude::*;
    pub use serde::{Deserialize, Serialize};
}
