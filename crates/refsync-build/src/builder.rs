//! EntityModelBuilder: assembles one model per entity class.

use crate::{
    BuildError,
    model::{EntityModel, FieldKind},
    resolve::ReferenceFieldResolver,
};
use rayon::prelude::*;
use refsync_config::ResolverConfig;
use refsync_schema::node::{ClassIndex, ClassNode};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

///
/// ModelSet
///

#[derive(Clone, Debug, Default)]
pub struct ModelSet {
    pub models: BTreeMap<String, EntityModel>,

    /// Entity classes declaring at least one public instance field.
    pub public_field_classes: BTreeSet<String>,
}

///
/// EntityModelBuilder
///

#[derive(Clone, Copy, Debug)]
pub struct EntityModelBuilder<'a> {
    index: &'a ClassIndex,
    config: &'a ResolverConfig,
    resolver: ReferenceFieldResolver<'a>,
}

impl<'a> EntityModelBuilder<'a> {
    #[must_use]
    pub const fn new(index: &'a ClassIndex, config: &'a ResolverConfig) -> Self {
        Self {
            index,
            config,
            resolver: ReferenceFieldResolver::new(index, config),
        }
    }

    /// Every class extending either base, plus every marked class.
    #[must_use]
    pub fn entity_classes(&self) -> Vec<&'a ClassNode> {
        let root = &self.config.root_type;
        let mut paths = BTreeSet::new();

        for base in [&self.config.entity_base, &self.config.entity_with_id] {
            for class in self.index.known_subclasses(base, root) {
                if !self.config.is_entity_base(&class.path) {
                    paths.insert(class.path.as_str());
                }
            }
        }
        for class in self.index.classes().filter(|c| c.has_entity_marker()) {
            paths.insert(class.path.as_str());
        }

        paths
            .into_iter()
            .filter_map(|path| self.index.get(path))
            .collect()
    }

    /// Root-first ancestor chain of `class`, the class itself last.
    fn chain(&self, class: &'a ClassNode) -> Vec<&'a ClassNode> {
        let mut chain = self
            .index
            .ancestors(&class.path, &self.config.root_type)
            .collect::<Vec<_>>();
        chain.reverse();
        chain.push(class);

        chain
    }

    pub fn build(&self) -> Result<ModelSet, BuildError> {
        let entities = self.entity_classes();

        // each class in any chain is resolved exactly once
        let needed = entities
            .iter()
            .flat_map(|class| self.chain(*class))
            .map(|class| (class.path.as_str(), class))
            .collect::<BTreeMap<_, _>>();
        let resolved = needed
            .into_par_iter()
            .map(|(path, class)| (path, self.resolver.resolve_class(class)))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(path, result)| result.map(|kinds| (path, kinds)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let models = entities
            .par_iter()
            .map(|class| self.assemble(*class, &resolved))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let public_field_classes = entities
            .iter()
            .filter(|class| {
                class
                    .fields
                    .iter()
                    .any(|f| f.is_public() && !f.is_static)
            })
            .map(|class| class.path.clone())
            .collect();

        info!(
            entities = models.len(),
            resolved = resolved.len(),
            "entity models built"
        );

        Ok(ModelSet {
            models: models
                .into_iter()
                .map(|model| (model.class().to_string(), model))
                .collect(),
            public_field_classes,
        })
    }

    fn assemble(
        &self,
        class: &'a ClassNode,
        resolved: &BTreeMap<&str, Vec<FieldKind>>,
    ) -> Result<EntityModel, BuildError> {
        let mut model = EntityModel::new(&class.path);

        for link in self.chain(class) {
            let kinds = resolved
                .get(link.path.as_str())
                .ok_or_else(|| BuildError::ClassNotFound(link.path.clone()))?;
            for kind in kinds {
                model.insert(kind.clone());
            }
        }
        model.check_relations()?;

        debug!(
            class = %class.path,
            fields = model.len(),
            relations = model.relations().count(),
            "entity model"
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;
    use refsync_schema::{
        node::{EntityMarker, FieldNode},
        types::TypeRef,
    };

    fn build(extra: impl IntoIterator<Item = ClassNode>) -> Result<ModelSet, BuildError> {
        let index = index(extra);
        let config = config();

        EntityModelBuilder::new(&index, &config).build()
    }

    #[test]
    fn entity_set_is_transitive_and_marked() {
        let index = index([
            order(),
            ClassNode::new("app::Gift").with_superclass(ORDER),
            ClassNode::new("app::Audit").with_entity(EntityMarker::default()),
            ClassNode::new("app::Address"),
        ]);
        let config = config();
        let paths = EntityModelBuilder::new(&index, &config)
            .entity_classes()
            .into_iter()
            .map(|c| c.path.as_str())
            .collect::<Vec<_>>();

        assert_eq!(
            paths,
            vec!["app::Audit", CUSTOMER, "app::Gift", ORDER, TAG]
        );
    }

    #[test]
    fn ancestors_come_first() {
        let set = build([order().with_field(field("customer", customer_ty()))]).unwrap();
        let model = &set.models[ORDER];

        assert_eq!(
            model.names().collect::<Vec<_>>(),
            vec!["id", "customer", "customer_id"]
        );
        assert_eq!(model.relations().count(), 1);
    }

    #[test]
    fn inherited_relations_reach_subclasses() {
        let set = build([
            order().with_field(field("customer", customer_ty())),
            ClassNode::new("app::Gift")
                .with_superclass(ORDER)
                .with_field(field("note", TypeRef::class("String"))),
        ])
        .unwrap();
        let gift = &set.models["app::Gift"];

        assert_eq!(
            gift.names().collect::<Vec<_>>(),
            vec!["id", "customer", "customer_id", "note"]
        );
        assert!(gift.has_relations());
    }

    #[test]
    fn subclass_shadowing_a_holder_collides() {
        let err = build([
            order().with_field(field("customer", customer_ty())),
            ClassNode::new("app::Gift")
                .with_superclass(ORDER)
                .with_field(field("customer_id", TypeRef::class("String"))),
        ])
        .unwrap_err();

        assert!(matches!(err, BuildError::NameCollision { class, .. } if class == "app::Gift"));
    }

    #[test]
    fn holder_declared_by_ancestor_is_bound_in_place() {
        let set = build([
            order().with_field(field("customer_id", object_id())),
            ClassNode::new("app::Gift")
                .with_superclass(ORDER)
                .with_field(field("customer", customer_ty())),
        ])
        .unwrap();
        let gift = &set.models["app::Gift"];

        assert_eq!(
            gift.names().collect::<Vec<_>>(),
            vec!["id", "customer_id", "customer"]
        );
        assert!(gift.get("customer_id").unwrap().as_holder().is_some());
        let (reference, _) = gift.relations().next().unwrap();
        assert!(reference.holder_already_declared);
    }

    #[test]
    fn incompatible_holder_declared_by_ancestor_collides() {
        let err = build([
            order().with_field(field("customer_id", TypeRef::class("String"))),
            ClassNode::new("app::Gift")
                .with_superclass(ORDER)
                .with_field(field("customer", customer_ty())),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            BuildError::NameCollision { class, reason, .. }
                if class == "app::Gift" && reason.contains(ORDER)
        ));
    }

    #[test]
    fn ignored_holder_declared_by_ancestor_collides() {
        let err = build([
            order().with_field(field("customer_id", object_id()).ignored()),
            ClassNode::new("app::Gift")
                .with_superclass(ORDER)
                .with_field(field("customer", customer_ty())),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            BuildError::NameCollision { class, reason, .. }
                if class == "app::Gift" && reason.contains("ignore")
        ));
    }

    #[test]
    fn errors_abort_the_whole_build() {
        let broken = ClassNode::new("app::Broken")
            .with_superclass(&config().entity_base)
            .with_field(FieldNode::new("note", TypeRef::class("app::Orphan")));
        let orphan = ClassNode::new("app::Orphan").with_superclass(&config().entity_base);

        let err = build([order(), broken, orphan]).unwrap_err();
        assert!(matches!(err, BuildError::MissingIdField { .. }));
    }

    #[test]
    fn public_field_classes_are_reported() {
        let set = build([order()
            .with_field(private(field("secret", TypeRef::class("String"))))
            .with_field(field("total", TypeRef::primitive("i64")).as_static())])
        .unwrap();

        assert!(!set.public_field_classes.contains(ORDER));
        assert!(set.public_field_classes.contains(CUSTOMER));
    }
}
