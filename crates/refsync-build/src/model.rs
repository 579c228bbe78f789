//! Per-class field classification consumed by accessor synthesis.

use crate::{BuildError, unwrap::Wrapper};
use indexmap::IndexMap;
use refsync_schema::types::TypeRef;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// FieldKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Plain { name: String, ty: TypeRef },
    ReferencedEntity(ReferencedEntityField),
    ReferenceHolder(ReferenceHolderField),
}

impl FieldKind {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain { name, .. } => name,
            Self::ReferencedEntity(field) => &field.name,
            Self::ReferenceHolder(field) => &field.name,
        }
    }

    #[must_use]
    pub const fn ty(&self) -> &TypeRef {
        match self {
            Self::Plain { ty, .. } => ty,
            Self::ReferencedEntity(field) => &field.ty,
            Self::ReferenceHolder(field) => &field.ty,
        }
    }

    #[must_use]
    pub const fn as_referenced(&self) -> Option<&ReferencedEntityField> {
        match self {
            Self::ReferencedEntity(field) => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_holder(&self) -> Option<&ReferenceHolderField> {
        match self {
            Self::ReferenceHolder(field) => Some(field),
            _ => None,
        }
    }
}

///
/// ReferencedEntityField
///
/// A field whose declared type is, or wraps, another entity. Persisted only
/// through its holder.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReferencedEntityField {
    pub name: String,
    pub ty: TypeRef,
    pub holder_name: String,
    pub holder_ty: TypeRef,
    pub target: String,
    pub target_id_field: String,
    pub target_id_ty: TypeRef,
    pub container_wrapped: bool,
    pub wrappers: Vec<Wrapper>,
    pub type_mappings: BTreeMap<String, String>,
    pub holder_already_declared: bool,

    /// Concrete type used to lazily initialize a list-wrapped holder.
    pub holder_init: Option<TypeRef>,

    /// Class declaring the field.
    pub declared_in: String,
}

///
/// ReferenceHolderField
///
/// The field that stores the identifier(s) of a referenced entity.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReferenceHolderField {
    pub name: String,
    pub ty: TypeRef,
    pub owner_name: String,
    pub owner_ty: TypeRef,
    pub target: String,
    pub target_id_field: String,
    pub container_wrapped: bool,
}

impl ReferenceHolderField {
    #[must_use]
    pub fn for_reference(reference: &ReferencedEntityField) -> Self {
        Self {
            name: reference.holder_name.clone(),
            ty: reference.holder_ty.clone(),
            owner_name: reference.name.clone(),
            owner_ty: reference.ty.clone(),
            target: reference.target.clone(),
            target_id_field: reference.target_id_field.clone(),
            container_wrapped: reference.container_wrapped,
        }
    }
}

///
/// EntityModel
///
/// Ordered field model of one class, ancestors included. A field redeclared
/// by a subclass takes over its ancestor's slot.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    class: String,
    fields: IndexMap<String, FieldKind>,
}

impl EntityModel {
    #[must_use]
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn insert(&mut self, kind: FieldKind) {
        self.fields.insert(kind.name().to_string(), kind);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldKind> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldKind> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every reference paired with its holder, in model order.
    pub fn relations(
        &self,
    ) -> impl Iterator<Item = (&ReferencedEntityField, &ReferenceHolderField)> {
        self.fields
            .values()
            .filter_map(FieldKind::as_referenced)
            .filter_map(|reference| {
                let holder = self.get(&reference.holder_name)?.as_holder()?;
                Some((reference, holder))
            })
    }

    #[must_use]
    pub fn has_relations(&self) -> bool {
        self.relations().next().is_some()
    }

    /// Verify that references and holders pair up one-to-one.
    pub fn check_relations(&self) -> Result<(), BuildError> {
        for kind in self.fields.values() {
            match kind {
                FieldKind::ReferencedEntity(reference) => {
                    let paired = self
                        .get(&reference.holder_name)
                        .and_then(FieldKind::as_holder)
                        .is_some_and(|holder| holder.owner_name == reference.name);

                    if !paired {
                        return Err(BuildError::name_collision(
                            &self.class,
                            &reference.name,
                            &reference.holder_name,
                            "the holder slot is taken by another field",
                        ));
                    }
                }
                FieldKind::ReferenceHolder(holder) => {
                    let paired = self
                        .get(&holder.owner_name)
                        .and_then(FieldKind::as_referenced)
                        .is_some_and(|reference| reference.holder_name == holder.name);

                    if !paired {
                        return Err(BuildError::name_collision(
                            &self.class,
                            &holder.owner_name,
                            &holder.name,
                            "the owning reference is shadowed by another field",
                        ));
                    }
                }
                FieldKind::Plain { .. } => {}
            }
        }

        Ok(())
    }
}
