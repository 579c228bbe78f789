//! TypeUnwrapper: strips array and list wrappers to find the core type.

use refsync_config::ResolverConfig;
use refsync_schema::types::TypeRef;
use serde::Serialize;

///
/// Wrapper
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrapper {
    Array,
    List(String),
}

///
/// CoreShape
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreShape<'t> {
    /// A plain class type; the entity candidate.
    Class(&'t str),

    Primitive,

    /// Any other parameterized type, a type variable, or a list-like
    /// wrapper with the wrong arity.
    Unsupported,
}

///
/// Unwrapped
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unwrapped<'t> {
    pub core: CoreShape<'t>,

    /// Wrappers stripped on the way down, outermost first.
    pub wrappers: Vec<Wrapper>,
}

impl<'t> Unwrapped<'t> {
    #[must_use]
    pub const fn wrapped(&self) -> bool {
        !self.wrappers.is_empty()
    }

    /// The candidate core class, or `None` when there is none.
    #[must_use]
    pub const fn core_path(&self) -> Option<&'t str> {
        match self.core {
            CoreShape::Class(path) => Some(path),
            CoreShape::Primitive | CoreShape::Unsupported => None,
        }
    }
}

///
/// TypeUnwrapper
///

#[derive(Clone, Copy, Debug)]
pub struct TypeUnwrapper<'a> {
    config: &'a ResolverConfig,
}

impl<'a> TypeUnwrapper<'a> {
    #[must_use]
    pub const fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn is_list(&self, path: &str) -> bool {
        self.config.container(path).is_some()
    }

    #[must_use]
    pub fn unwrap<'t>(&self, ty: &'t TypeRef) -> Unwrapped<'t> {
        let mut wrappers = Vec::new();
        let mut current = ty;

        let core = loop {
            match current {
                TypeRef::Array { component } => {
                    wrappers.push(Wrapper::Array);
                    current = &**component;
                }
                TypeRef::Parameterized { path, args } if self.is_list(path) => {
                    let [arg] = args.as_slice() else {
                        break CoreShape::Unsupported;
                    };
                    wrappers.push(Wrapper::List(path.clone()));
                    current = arg;
                }
                TypeRef::Class { path } => break CoreShape::Class(path),
                TypeRef::Primitive { .. } => break CoreShape::Primitive,
                TypeRef::Parameterized { .. } | TypeRef::Variable { .. } => {
                    break CoreShape::Unsupported;
                }
            }
        };

        Unwrapped { core, wrappers }
    }
}
