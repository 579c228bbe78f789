use crate::prelude::*;
use refsync_config::ResolverConfig;

/// Fields carrying the identifier marker on classes that already inherit the
/// conventional identifier from the entity-with-id base.
#[must_use]
pub fn duplicate_identifiers<'a>(
    index: &'a ClassIndex,
    config: &ResolverConfig,
) -> Vec<(&'a ClassNode, &'a FieldNode)> {
    index
        .known_subclasses(&config.entity_with_id, &config.root_type)
        .into_iter()
        .flat_map(|class| class.fields.iter().filter(|f| f.id).map(move |f| (class, f)))
        .collect()
}

pub fn validate_identifiers(index: &ClassIndex, config: &ResolverConfig, errs: &mut ErrorTree) {
    for (class, field) in duplicate_identifiers(index, config) {
        errs.add_for(
            &class.path,
            format!(
                "field '{}' is marked as identifier but '{}' already provides '{}'",
                field.ident, config.entity_with_id, config.conventional_id.field
            ),
        );
    }
}
