//! Property-name replacement map: user-facing property names to the names
//! under which they are persisted.

use crate::{model::EntityModel, naming::getter_property};
use refsync_config::ResolverConfig;
use refsync_schema::node::ClassIndex;
use std::collections::BTreeMap;
use tracing::debug;

pub type ReplacementMap = BTreeMap<String, BTreeMap<String, String>>;

///
/// PropertyReplacer
///

#[derive(Clone, Copy, Debug)]
pub struct PropertyReplacer<'a> {
    index: &'a ClassIndex,
    config: &'a ResolverConfig,
}

impl<'a> PropertyReplacer<'a> {
    #[must_use]
    pub const fn new(index: &'a ClassIndex, config: &'a ResolverConfig) -> Self {
        Self { index, config }
    }

    /// Build the map for every modelled entity and every projection of one.
    /// Classes without any replacement are left out.
    #[must_use]
    pub fn build(&self, models: &BTreeMap<String, EntityModel>) -> ReplacementMap {
        let mut out = ReplacementMap::new();

        for (path, model) in models {
            let mut map = self.class_mappings(path);
            for (reference, holder) in model.relations() {
                map.insert(reference.name.clone(), holder.name.clone());
            }

            if !map.is_empty() {
                debug!(class = %path, replacements = map.len(), "property replacements");
                out.insert(path.clone(), map);
            }
        }

        let projections = self
            .index
            .classes()
            .filter_map(|class| {
                let target = class.projection_for.as_deref()?;
                let map = out.get(target)?;
                Some((class.path.clone(), map.clone()))
            })
            .collect::<Vec<_>>();
        out.extend(projections);

        out
    }

    /// Overrides declared on fields and getters along the ancestor chain;
    /// the nearest declaration wins.
    #[must_use]
    pub fn class_mappings(&self, path: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let Some(class) = self.index.get(path) else {
            return map;
        };

        let mut chain = self
            .index
            .ancestors(path, &self.config.root_type)
            .collect::<Vec<_>>();
        chain.reverse();
        chain.push(class);

        for link in chain {
            for field in link.fields.iter() {
                if let Some(property) = &field.property {
                    map.insert(field.ident.clone(), property.clone());
                }
            }
            for method in link.methods.iter().filter(|m| !m.is_static) {
                let Some(property) = &method.property else {
                    continue;
                };
                if let Some(name) = getter_property(&method.ident, &self.config.getter_prefix) {
                    map.insert(name, property.clone());
                }
            }
        }

        map
    }
}
