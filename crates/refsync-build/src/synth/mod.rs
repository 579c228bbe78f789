//! AccessorSynthesizer: turns a finished entity model into a
//! [`ClassAugmentation`], the target-independent list of members to add.

pub mod emit;


use crate::{
    model::{EntityModel, ReferencedEntityField},
    naming::{getter_name, relation_const, setter_name},
};
use refsync_schema::{
    node::{ClassIndex, ClassNode, MethodNode},
    types::TypeRef,
};
use serde::Serialize;
use tracing::debug;

pub const VALIDATION_ROUTINE: &str = "check_references";
pub const IMPLICIT_EPILOGUE: &str = "checked";

///
/// AccessorRole
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorRole {
    EntityGetter,
    EntitySetter,
    HolderGetter,
    HolderSetter,
}

///
/// SyntheticField
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SyntheticField {
    pub name: String,
    pub ty: TypeRef,
}

///
/// SyntheticMethod
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SyntheticMethod {
    pub name: String,
    pub role: AccessorRole,

    /// Name of the reference field the accessor belongs to.
    pub relation: String,
    pub params: Vec<TypeRef>,
    pub returns: Option<TypeRef>,
}

///
/// RelationPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelationPlan {
    pub const_name: String,
    pub reference: ReferencedEntityField,
}

///
/// ValidationRoutine
///
/// Runs once after every construction path: lazily initializes list-wrapped
/// holders, then reconciles each relation in model order.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationRoutine {
    pub name: String,
    pub lazy_init: Vec<SyntheticField>,
    pub relations: Vec<String>,
}

///
/// ConstructorEpilogue
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstructorEpilogue {
    /// Struct-literal or `Default` construction.
    Implicit,

    /// A constructor the class declares itself.
    Declared { ident: String, params: Vec<TypeRef> },
}

impl ConstructorEpilogue {
    /// Name of the generated wrapper that runs the validation routine.
    #[must_use]
    pub fn wrapper_name(&self) -> String {
        match self {
            Self::Implicit => IMPLICIT_EPILOGUE.to_string(),
            Self::Declared { ident, .. } => format!("{ident}_{IMPLICIT_EPILOGUE}"),
        }
    }
}

///
/// Marker
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    SkipPersist,
    SkipSerialize,
}

///
/// FieldMarker
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldMarker {
    pub field: String,
    pub marker: Marker,
}

///
/// ClassAugmentation
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClassAugmentation {
    pub class: String,
    pub relations: Vec<RelationPlan>,
    pub fields: Vec<SyntheticField>,
    pub methods: Vec<SyntheticMethod>,
    pub validation: ValidationRoutine,
    pub epilogues: Vec<ConstructorEpilogue>,
    pub markers: Vec<FieldMarker>,
}

impl ClassAugmentation {
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationPlan> {
        self.relations.iter().find(|plan| plan.reference.name == name)
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&SyntheticMethod> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn markers_of(&self, marker: Marker) -> impl Iterator<Item = &str> {
        self.markers
            .iter()
            .filter(move |m| m.marker == marker)
            .map(|m| m.field.as_str())
    }
}

///
/// AccessorSynthesizer
///

#[derive(Clone, Copy, Debug)]
pub struct AccessorSynthesizer<'a> {
    index: &'a ClassIndex,
}

impl<'a> AccessorSynthesizer<'a> {
    #[must_use]
    pub const fn new(index: &'a ClassIndex) -> Self {
        Self { index }
    }

    /// Describe the members `model`'s class gains; `None` when the class has
    /// no relation at all.
    #[must_use]
    pub fn synthesize(&self, model: &EntityModel) -> Option<ClassAugmentation> {
        if !model.has_relations() {
            return None;
        }

        let class = self.index.get(model.class());
        let declares = |name: &str, params: &[TypeRef]| {
            class.is_some_and(|class| class.has_method(name, params))
        };

        let mut aug = ClassAugmentation {
            class: model.class().to_string(),
            relations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            validation: ValidationRoutine {
                name: VALIDATION_ROUTINE.to_string(),
                lazy_init: Vec::new(),
                relations: Vec::new(),
            },
            epilogues: Vec::new(),
            markers: Vec::new(),
        };

        for (reference, holder) in model.relations() {
            let const_name = relation_const(&reference.name);

            if !reference.holder_already_declared {
                aug.fields.push(SyntheticField {
                    name: holder.name.clone(),
                    ty: holder.ty.clone(),
                });
            }

            let accessors = [
                (
                    &reference.name,
                    &reference.ty,
                    AccessorRole::EntityGetter,
                    AccessorRole::EntitySetter,
                ),
                (
                    &holder.name,
                    &holder.ty,
                    AccessorRole::HolderGetter,
                    AccessorRole::HolderSetter,
                ),
            ];
            for (field, ty, getter, setter) in accessors {
                let candidates = [
                    (getter_name(field), getter, Vec::new(), Some(ty.clone())),
                    (setter_name(field), setter, vec![ty.clone()], None),
                ];
                for (name, role, params, returns) in candidates {
                    if declares(&name, &params) {
                        debug!(class = model.class(), method = %name, "accessor declared, skipped");
                        continue;
                    }

                    debug!(class = model.class(), method = %name, ?role, "accessor");
                    aug.methods.push(SyntheticMethod {
                        name,
                        role,
                        relation: reference.name.clone(),
                        params,
                        returns,
                    });
                }
            }

            if let Some(init) = &reference.holder_init {
                aug.validation.lazy_init.push(SyntheticField {
                    name: holder.name.clone(),
                    ty: init.clone(),
                });
            }
            aug.validation.relations.push(const_name.clone());

            aug.markers.push(FieldMarker {
                field: reference.name.clone(),
                marker: Marker::SkipPersist,
            });
            aug.markers.push(FieldMarker {
                field: holder.name.clone(),
                marker: Marker::SkipSerialize,
            });

            aug.relations.push(RelationPlan {
                const_name,
                reference: reference.clone(),
            });
        }

        let constructors = class
            .into_iter()
            .flat_map(ClassNode::constructors)
            .collect::<Vec<_>>();
        aug.epilogues = Self::epilogues(&constructors, &declares);

        Some(aug)
    }

    // implicit construction first, then declared constructors in order
    fn epilogues(
        constructors: &[&MethodNode],
        declares: &impl Fn(&str, &[TypeRef]) -> bool,
    ) -> Vec<ConstructorEpilogue> {
        std::iter::once(ConstructorEpilogue::Implicit)
            .chain(constructors.iter().map(|ctor| ConstructorEpilogue::Declared {
                ident: ctor.ident.clone(),
                params: ctor.params.clone(),
            }))
            .filter(|epilogue| {
                let params = match epilogue {
                    ConstructorEpilogue::Implicit => &[][..],
                    ConstructorEpilogue::Declared { params, .. } => params.as_slice(),
                };
                !declares(&epilogue.wrapper_name(), params)
            })
            .collect()
    }
}
