use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TypeRef
///
/// Static type of a field, method parameter or return value, as recorded by
/// the index scanner.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive { name: String },
    Class { path: String },
    Array { component: Box<Self> },
    Parameterized { path: String, args: Vec<Self> },
    Variable { name: String },
}

impl TypeRef {
    #[must_use]
    pub fn primitive(name: &str) -> Self {
        Self::Primitive {
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn class(path: &str) -> Self {
        Self::Class {
            path: path.to_string(),
        }
    }

    #[must_use]
    pub fn array(component: Self) -> Self {
        Self::Array {
            component: Box::new(component),
        }
    }

    #[must_use]
    pub fn parameterized(path: &str, args: Vec<Self>) -> Self {
        Self::Parameterized {
            path: path.to_string(),
            args,
        }
    }

    /// Shorthand for a single-argument parameterized type such as `Vec<T>`.
    #[must_use]
    pub fn generic(path: &str, arg: Self) -> Self {
        Self::parameterized(path, vec![arg])
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name } | Self::Variable { name } => write!(f, "{name}"),
            Self::Class { path } => write!(f, "{path}"),
            Self::Array { component } => write!(f, "[{component}]"),
            Self::Parameterized { path, args } => {
                let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{path}<{}>", args.join(", "))
            }
        }
    }
}

///
/// IndexDirection
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IndexDirection {
    #[default]
    Asc,
    Desc,
}
