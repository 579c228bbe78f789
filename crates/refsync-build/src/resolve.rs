//! ReferenceFieldResolver: classifies the declared fields of one class.

use crate::{
    BuildError,
    classify::{Classification, EntityClassifier},
    model::{FieldKind, ReferenceHolderField, ReferencedEntityField},
    unwrap::{CoreShape, TypeUnwrapper, Wrapper},
};
use indexmap::IndexMap;
use refsync_config::ResolverConfig;
use refsync_schema::{
    node::{ClassIndex, ClassNode, FieldNode},
    types::TypeRef,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

///
/// ReferenceFieldResolver
///

#[derive(Clone, Copy, Debug)]
pub struct ReferenceFieldResolver<'a> {
    index: &'a ClassIndex,
    config: &'a ResolverConfig,
    unwrapper: TypeUnwrapper<'a>,
    classifier: EntityClassifier<'a>,
}

impl<'a> ReferenceFieldResolver<'a> {
    #[must_use]
    pub const fn new(index: &'a ClassIndex, config: &'a ResolverConfig) -> Self {
        Self {
            index,
            config,
            unwrapper: TypeUnwrapper::new(config),
            classifier: EntityClassifier::new(index, config),
        }
    }

    /// Classify the fields `class` declares itself, in model order.
    ///
    /// Static and ignored fields are left out. A holder the class declares
    /// keeps its declared position; a synthesized one follows its reference.
    pub fn resolve_class(&self, class: &ClassNode) -> Result<Vec<FieldKind>, BuildError> {
        let mut relations = self.collect_relations(class)?;
        let inherited = self.bind_declared_holders(class, &mut relations)?;

        let mut out = Vec::with_capacity(class.fields.len() + relations.len());
        for field in class.fields.iter() {
            if let Some(reference) = relations.get(&field.ident) {
                out.push(FieldKind::ReferenceHolder(ReferenceHolderField::for_reference(
                    reference,
                )));
                continue;
            }
            if field.is_static || field.ignore {
                continue;
            }

            match relations.values().find(|r| r.name == field.ident) {
                Some(reference) => {
                    out.push(FieldKind::ReferencedEntity(reference.clone()));
                    if !reference.holder_already_declared
                        || inherited.contains(&reference.holder_name)
                    {
                        out.push(FieldKind::ReferenceHolder(
                            ReferenceHolderField::for_reference(reference),
                        ));
                    }
                }
                None => {
                    debug!(class = %class.path, field = %field.ident, "plain field");
                    out.push(FieldKind::Plain {
                        name: field.ident.clone(),
                        ty: field.ty.clone(),
                    });
                }
            }
        }

        Ok(out)
    }

    // references keyed by holder name, in declaration order
    fn collect_relations(
        &self,
        class: &ClassNode,
    ) -> Result<IndexMap<String, ReferencedEntityField>, BuildError> {
        let mut relations: IndexMap<String, ReferencedEntityField> = IndexMap::new();

        for field in class.fields.iter().filter(|f| !f.is_static && !f.ignore) {
            let Some(reference) = self.resolve_field(class, field)? else {
                continue;
            };

            if let Some(other) = relations.get(&reference.holder_name) {
                return Err(BuildError::name_collision(
                    &class.path,
                    &field.ident,
                    &reference.holder_name,
                    format!("already used as holder by '{}'", other.name),
                ));
            }

            debug!(
                class = %class.path,
                field = %field.ident,
                holder = %reference.holder_name,
                target = %reference.target,
                wrapped = reference.container_wrapped,
                "reference field"
            );
            relations.insert(reference.holder_name.clone(), reference);
        }

        for reference in relations.values() {
            if relations.values().any(|r| r.name == reference.holder_name) {
                return Err(BuildError::name_collision(
                    &class.path,
                    &reference.name,
                    &reference.holder_name,
                    "names a reference field",
                ));
            }
        }

        Ok(relations)
    }

    // validate holders declared by the class or an ancestor and adopt their
    // types; returns the names that only an ancestor declares
    fn bind_declared_holders(
        &self,
        class: &ClassNode,
        relations: &mut IndexMap<String, ReferencedEntityField>,
    ) -> Result<BTreeSet<String>, BuildError> {
        let mut inherited = BTreeSet::new();

        for reference in relations.values_mut() {
            let Some((owner, declared)) = self.index.field_in_chain(
                &class.path,
                &reference.holder_name,
                &self.config.root_type,
            ) else {
                continue;
            };
            let place = if owner.path == class.path {
                "the holder field".to_string()
            } else {
                format!("the holder inherited from '{}'", owner.path)
            };
            let collision = |reason: String| {
                BuildError::name_collision(
                    &class.path,
                    &reference.name,
                    &reference.holder_name,
                    reason,
                )
            };

            if declared.ignore {
                return Err(collision(format!("{place} is marked ignore")));
            }
            if declared.is_static {
                return Err(collision(format!("{place} is static")));
            }
            if !self.holder_compatible(reference, &declared.ty) {
                return Err(collision(format!(
                    "{place} is declared as '{}' but the holder requires '{}'",
                    declared.ty, reference.holder_ty
                )));
            }

            if owner.path != class.path {
                inherited.insert(reference.holder_name.clone());
            }
            reference.holder_ty = declared.ty.clone();
            reference.holder_already_declared = true;
        }

        Ok(inherited)
    }

    // equal to the derived type, or to it with the mapped container undone
    fn holder_compatible(&self, reference: &ReferencedEntityField, declared: &TypeRef) -> bool {
        if *declared == reference.holder_ty {
            return true;
        }

        self.holder_type(
            &reference.ty,
            &reference.target,
            &reference.target_id_ty,
            &BTreeMap::new(),
        )
        .is_some_and(|unmapped| unmapped == *declared)
    }

    /// Resolve one declared field; `None` means the field is plain.
    pub fn resolve_field(
        &self,
        class: &ClassNode,
        field: &FieldNode,
    ) -> Result<Option<ReferencedEntityField>, BuildError> {
        let unwrapped = self.unwrapper.unwrap(&field.ty);
        let unsupported = || BuildError::UnsupportedGenericShape {
            class: class.path.clone(),
            field: field.ident.clone(),
            ty: field.ty.to_string(),
        };

        let target_path = match unwrapped.core {
            CoreShape::Class(path) => path,
            CoreShape::Unsupported if field.reference.is_some() => return Err(unsupported()),
            CoreShape::Unsupported | CoreShape::Primitive => return Ok(None),
        };

        let classification = self.classifier.classify(target_path);
        if !classification.is_entity() {
            return Ok(None);
        }
        if unwrapped.wrappers.len() > 1 {
            return Err(unsupported());
        }

        let Some(target) = self.index.get(target_path) else {
            return Ok(None);
        };

        let reference = field.reference.clone().unwrap_or_default();
        let holder_name = reference.holder_override().map_or_else(
            || format!("{}{}", field.ident, self.config.holder_suffix),
            str::to_string,
        );
        let (target_id_field, target_id_ty) =
            self.target_id(class, field, target, classification)?;
        let type_mappings = reference.mapping_table();

        self.check_containers(class, field, &unwrapped.wrappers, &type_mappings)?;
        let holder_ty = self
            .holder_type(&field.ty, target_path, &target_id_ty, &type_mappings)
            .ok_or_else(unsupported)?;
        let holder_init = match unwrapped.wrappers.first() {
            Some(Wrapper::List(_)) => Some(holder_ty.clone()),
            Some(Wrapper::Array) | None => None,
        };

        Ok(Some(ReferencedEntityField {
            name: field.ident.clone(),
            ty: field.ty.clone(),
            holder_name,
            holder_ty,
            target: target_path.to_string(),
            target_id_field,
            target_id_ty,
            container_wrapped: unwrapped.wrapped(),
            wrappers: unwrapped.wrappers,
            type_mappings,
            holder_already_declared: false,
            holder_init,
            declared_in: class.path.clone(),
        }))
    }

    // conventional identifier, else the first marked field, else the fallback name
    fn target_id(
        &self,
        class: &ClassNode,
        field: &FieldNode,
        target: &ClassNode,
        classification: Classification,
    ) -> Result<(String, TypeRef), BuildError> {
        if classification.has_predefined_id() {
            let id = &self.config.conventional_id;
            return Ok((id.field.clone(), TypeRef::class(&id.ty)));
        }

        target
            .fields
            .iter()
            .find(|f| f.id)
            .or_else(|| target.fields.get(&self.config.fallback_id_field))
            .map(|f| (f.ident.clone(), f.ty.clone()))
            .ok_or_else(|| BuildError::MissingIdField {
                class: class.path.clone(),
                field: field.ident.clone(),
                target: target.path.clone(),
            })
    }

    fn check_containers(
        &self,
        class: &ClassNode,
        field: &FieldNode,
        wrappers: &[Wrapper],
        mappings: &BTreeMap<String, String>,
    ) -> Result<(), BuildError> {
        for wrapper in wrappers {
            let Wrapper::List(container) = wrapper else {
                continue;
            };
            if !self.is_instantiable(container) && !mappings.contains_key(container) {
                return Err(BuildError::TypeMappingRequired {
                    class: class.path.clone(),
                    field: field.ident.clone(),
                    container: container.clone(),
                });
            }
        }

        Ok(())
    }

    /// The index decides when it knows the container, then the config.
    #[must_use]
    pub fn is_instantiable(&self, container: &str) -> bool {
        self.index.get(container).map_or_else(
            || {
                self.config
                    .container(container)
                    .is_some_and(|c| c.instantiable)
            },
            ClassNode::is_instantiable,
        )
    }

    // rebuild `ty` with the target replaced by its identifier type and each
    // list container replaced by its mapping, if any
    fn holder_type(
        &self,
        ty: &TypeRef,
        target: &str,
        id_ty: &TypeRef,
        mappings: &BTreeMap<String, String>,
    ) -> Option<TypeRef> {
        match ty {
            TypeRef::Array { component } => Some(TypeRef::array(self.holder_type(
                component, target, id_ty, mappings,
            )?)),
            TypeRef::Parameterized { path, args } if self.unwrapper.is_list(path) => {
                let [arg] = args.as_slice() else {
                    return None;
                };
                let container = mappings.get(path).unwrap_or(path);

                Some(TypeRef::generic(
                    container,
                    self.holder_type(arg, target, id_ty, mappings)?,
                ))
            }
            TypeRef::Class { path } if path == target => Some(id_ty.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
