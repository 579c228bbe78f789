//! Structural checks run over the class index before resolution.

pub mod identifier;
pub mod index;

use crate::{error::ErrorTree, node::ClassIndex};
use refsync_config::ResolverConfig;

/// Run every index-wide check, collecting all violations.
pub fn validate_index(index: &ClassIndex, config: &ResolverConfig) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    identifier::validate_identifiers(index, config, &mut errs);
    index::validate_entity_indexes(index, config, &mut errs);

    errs.result()
}
