use crate::prelude::*;
use refsync_config::ResolverConfig;

pub fn validate_entity_indexes(index: &ClassIndex, config: &ResolverConfig, errs: &mut ErrorTree) {
    for class in index.classes() {
        let Some(marker) = &class.entity else {
            continue;
        };
        let mut class_errs = ErrorTree::new();

        if marker
            .collection
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            err!(class_errs, "collection name must not be empty");
        }

        for spec in &marker.indexes {
            if spec.keys.is_empty() {
                err!(class_errs, "index {spec} has no keys");
            }

            for key in &spec.keys {
                if !has_field(index, config, class, &key.field) {
                    err!(
                        class_errs,
                        "index {spec} names unknown field '{}'",
                        key.field
                    );
                }
            }
        }

        errs.merge_for(&class.path, class_errs);
    }
}

// the conventional identifier counts as declared on entity-with-id subclasses
fn has_field(index: &ClassIndex, config: &ResolverConfig, class: &ClassNode, field: &str) -> bool {
    if index
        .field_in_chain(&class.path, field, &config.root_type)
        .is_some()
    {
        return true;
    }

    field == config.conventional_id.field
        && index.is_subclass_of(&class.path, &config.entity_with_id, &config.root_type)
}
