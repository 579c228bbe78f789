//! Rust materialization of [`ClassAugmentation`] descriptors.
//!
//! Entity, holder and identifier fields are `Option<T>`; arrays become
//! `Box<[T]>`. All runtime items are named through [`CratePaths`].

use super::{AccessorRole, ClassAugmentation, ConstructorEpilogue, Marker, RelationPlan, SyntheticMethod};
use crate::{
    BuildError, catalog::CatalogEntry, naming::ident, paths::CratePaths,
    replacement::ReplacementMap,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use refsync_schema::{
    node::IndexSpec,
    types::{IndexDirection, TypeRef},
};
use syn::Path;

fn parse_path(path: &str) -> Result<Path, BuildError> {
    syn::parse_str::<Path>(path).map_err(|_| BuildError::InvalidPath(path.to_string()))
}

/// Rust type for a metadata type reference.
pub fn rust_type(ty: &TypeRef) -> Result<TokenStream, BuildError> {
    let tokens = match ty {
        TypeRef::Primitive { name } | TypeRef::Variable { name } => {
            let name = ident(name)?;
            quote!(#name)
        }
        TypeRef::Class { path } => {
            let path = parse_path(path)?;
            quote!(#path)
        }
        TypeRef::Array { component } => {
            let component = rust_type(component)?;
            quote!(::std::boxed::Box<[#component]>)
        }
        TypeRef::Parameterized { path, args } => {
            let path = parse_path(path)?;
            let args = args.iter().map(rust_type).collect::<Result<Vec<_>, _>>()?;
            quote!(#path<#(#args),*>)
        }
    };

    Ok(tokens)
}

///
/// Emitter
///

#[derive(Clone, Copy, Debug)]
pub struct Emitter<'a> {
    paths: &'a CratePaths,
}

impl<'a> Emitter<'a> {
    #[must_use]
    pub const fn new(paths: &'a CratePaths) -> Self {
        Self { paths }
    }

    /// Inherent impl block plus the `ReferenceCheck` impl for one class.
    pub fn augmentation(&self, aug: &ClassAugmentation) -> Result<TokenStream, BuildError> {
        let class = parse_path(&aug.class)?;

        let consts = aug
            .relations
            .iter()
            .map(|plan| self.relation_const(&aug.class, plan))
            .collect::<Result<Vec<_>, _>>()?;
        let methods = aug
            .methods
            .iter()
            .map(|method| self.accessor(aug, method))
            .collect::<Result<Vec<_>, _>>()?;
        let epilogues = aug
            .epilogues
            .iter()
            .map(|epilogue| self.epilogue(epilogue))
            .collect::<Result<Vec<_>, _>>()?;
        let markers = Self::markers(aug);
        let check = self.reference_check(aug)?;

        Ok(quote! {
            impl #class {
                #(#consts)*
                #markers
                #(#methods)*
                #(#epilogues)*
            }

            #check
        })
    }

    /// Holder field declarations to inject into the class body.
    pub fn field_decls(&self, aug: &ClassAugmentation) -> Result<TokenStream, BuildError> {
        let mut tokens = quote!();
        for field in &aug.fields {
            let name = ident(&field.name)?;
            let ty = rust_type(&field.ty)?;
            tokens.extend(quote! {
                pub #name: ::std::option::Option<#ty>,
            });
        }

        Ok(tokens)
    }

    /// Start-up function publishing the replacement map and entity catalog.
    #[must_use]
    pub fn bootstrap(&self, replacements: &ReplacementMap, catalog: &[CatalogEntry]) -> TokenStream {
        let rt = &self.paths.runtime;

        let replacements = replacements.iter().map(|(class, map)| {
            let keys = map.keys();
            let values = map.values();
            quote!(.with_replacements(#class, &[#((#keys, #values)),*]))
        });
        let entities = catalog.iter().map(|entry| {
            let path = &entry.path;
            let collection = &entry.collection;
            let client = entry.client.as_ref().map(|c| quote!(.with_client(#c)));
            let database = entry.database.as_ref().map(|d| quote!(.with_database(#d)));
            let indexes = entry.indexes.iter().map(|spec| self.index_def(spec));

            quote! {
                .with_entity(
                    #rt::model::EntityEntry::new(#path, #collection)
                        #client
                        #database
                        #(.with_index(#indexes))*
                )
            }
        });

        quote! {
            /// Publish the build-time registry snapshot. Call once at start-up.
            pub fn bootstrap() -> ::std::result::Result<
                ::std::sync::Arc<#rt::registry::Registry>,
                #rt::error::RegistryError,
            > {
                #rt::registry::publish(
                    #rt::registry::Registry::new()
                        #(#replacements)*
                        #(#entities)*
                )
            }
        }
    }

    fn index_def(&self, spec: &IndexSpec) -> TokenStream {
        let rt = &self.paths.runtime;
        let keys = spec.keys.iter().map(|key| {
            let field = &key.field;
            let direction = match key.direction {
                IndexDirection::Asc => quote!(#rt::index::IndexDirection::Asc),
                IndexDirection::Desc => quote!(#rt::index::IndexDirection::Desc),
            };
            quote!(#rt::index::IndexKey::new(#field, #direction))
        });
        let IndexSpec {
            background,
            unique,
            name,
            sparse,
            expire_after_seconds,
            hidden,
            ..
        } = spec;

        quote! {
            #rt::index::IndexDef {
                keys: ::std::vec![#(#keys),*],
                background: #background,
                unique: #unique,
                name: ::std::string::String::from(#name),
                sparse: #sparse,
                expire_after_seconds: #expire_after_seconds,
                hidden: #hidden,
            }
        }
    }

    fn relation_const(&self, class: &str, plan: &RelationPlan) -> Result<TokenStream, BuildError> {
        let rt = &self.paths.runtime;
        let name = ident(&plan.const_name)?;
        let r = &plan.reference;
        let (field, holder, target, target_id) =
            (&r.name, &r.holder_name, &r.target, &r.target_id_field);
        let wrapped = r.container_wrapped.then(|| quote!(.wrapped()));

        Ok(quote! {
            pub const #name: #rt::model::RelationModel =
                #rt::model::RelationModel::new(#class, #field, #holder, #target, #target_id)
                    #wrapped;
        })
    }

    fn markers(aug: &ClassAugmentation) -> TokenStream {
        let persist = aug.markers_of(Marker::SkipPersist);
        let serialize = aug.markers_of(Marker::SkipSerialize);

        quote! {
            pub const SKIP_PERSIST: &'static [&'static str] = &[#(#persist),*];
            pub const SKIP_SERIALIZE: &'static [&'static str] = &[#(#serialize),*];
        }
    }

    fn accessor(
        &self,
        aug: &ClassAugmentation,
        method: &SyntheticMethod,
    ) -> Result<TokenStream, BuildError> {
        let rt = &self.paths.runtime;
        let plan = aug
            .relation(&method.relation)
            .ok_or_else(|| BuildError::MissingRelation {
                class: aug.class.clone(),
                field: method.relation.clone(),
            })?;
        let r = &plan.reference;

        let name = ident(&method.name)?;
        let relation = ident(&plan.const_name)?;
        let field = ident(&r.name)?;
        let holder = ident(&r.holder_name)?;
        let entity_ty = rust_type(&r.ty)?;
        let holder_ty = rust_type(&r.holder_ty)?;
        let id_of = Self::id_of(plan)?;

        let tokens = match method.role {
            AccessorRole::EntityGetter => quote! {
                #[must_use]
                pub fn #name(&self) -> ::std::option::Option<&#entity_ty> {
                    self.#field.as_ref()
                }
            },
            AccessorRole::HolderGetter => quote! {
                #[must_use]
                pub fn #name(&self) -> ::std::option::Option<&#holder_ty> {
                    self.#holder.as_ref()
                }
            },
            AccessorRole::EntitySetter => {
                let call = if r.container_wrapped {
                    quote!(#rt::sync::set_entities)
                } else {
                    quote!(#rt::sync::set_entity)
                };
                quote! {
                    pub fn #name(&mut self, value: ::std::option::Option<#entity_ty>) {
                        #call(&Self::#relation, &mut self.#field, &mut self.#holder, value, #id_of);
                    }
                }
            }
            AccessorRole::HolderSetter => {
                let call = if r.container_wrapped {
                    let target = parse_path(&r.target)?;
                    let id_ty = rust_type(&r.target_id_ty)?;
                    quote!(#rt::sync::set_holders::<#entity_ty, #holder_ty, #target, #id_ty>)
                } else {
                    quote!(#rt::sync::set_holder)
                };
                quote! {
                    pub fn #name(&mut self, value: ::std::option::Option<#holder_ty>) {
                        #call(&Self::#relation, &mut self.#field, &mut self.#holder, value);
                    }
                }
            }
        };

        Ok(tokens)
    }

    fn id_of(plan: &RelationPlan) -> Result<TokenStream, BuildError> {
        let target = parse_path(&plan.reference.target)?;
        let id = ident(&plan.reference.target_id_field)?;

        Ok(quote!(|entity: &#target| entity.#id.clone()))
    }

    fn epilogue(&self, epilogue: &ConstructorEpilogue) -> Result<TokenStream, BuildError> {
        let rt = &self.paths.runtime;
        let wrapper = ident(&epilogue.wrapper_name())?;

        let tokens = match epilogue {
            ConstructorEpilogue::Implicit => quote! {
                pub fn #wrapper(self) -> ::std::result::Result<Self, #rt::error::InconsistentReferenceError> {
                    #rt::traits::construct(self)
                }
            },
            ConstructorEpilogue::Declared { ident: ctor, params } => {
                let ctor = ident(ctor)?;
                let args = (0..params.len())
                    .map(|i| format_ident!("p{}", i))
                    .collect::<Vec<_>>();
                let tys = params.iter().map(rust_type).collect::<Result<Vec<_>, _>>()?;
                quote! {
                    pub fn #wrapper(#(#args: #tys),*) -> ::std::result::Result<Self, #rt::error::InconsistentReferenceError> {
                        #rt::traits::construct(Self::#ctor(#(#args),*))
                    }
                }
            }
        };

        Ok(tokens)
    }

    fn reference_check(&self, aug: &ClassAugmentation) -> Result<TokenStream, BuildError> {
        let rt = &self.paths.runtime;
        let class = parse_path(&aug.class)?;
        let routine = ident(&aug.validation.name)?;

        let mut body = quote!();
        // the container type is inferred from the holder field itself
        for field in &aug.validation.lazy_init {
            let holder = ident(&field.name)?;
            body.extend(quote! {
                #rt::sync::init_holder(&mut self.#holder);
            });
        }
        for const_name in &aug.validation.relations {
            let Some(plan) = aug.relations.iter().find(|p| &p.const_name == const_name) else {
                continue;
            };
            let r = &plan.reference;
            let relation = ident(const_name)?;
            let field = ident(&r.name)?;
            let holder = ident(&r.holder_name)?;
            let id_of = Self::id_of(plan)?;
            let call = if r.container_wrapped {
                quote!(#rt::sync::validate_many)
            } else {
                quote!(#rt::sync::validate_single)
            };
            body.extend(quote! {
                #call(&Self::#relation, &mut self.#field, &mut self.#holder, #id_of)?;
            });
        }

        Ok(quote! {
            impl #rt::traits::ReferenceCheck for #class {
                fn #routine(&mut self) -> ::std::result::Result<(), #rt::error::InconsistentReferenceError> {
                    #body
                    Ok(())
                }
            }
        })
    }
}
