use crate::BuildError;
use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span};

/// Setter name for a field: `customer` -> `set_customer`.
#[must_use]
pub fn setter_name(field: &str) -> String {
    format!("set_{}", field.to_case(Case::Snake))
}

/// Getter name for a field: the field name itself, snake-cased.
#[must_use]
pub fn getter_name(field: &str) -> String {
    field.to_case(Case::Snake)
}

/// Constant naming the relation owned by `field`.
#[must_use]
pub fn relation_const(field: &str) -> String {
    format!("{}_RELATION", field.to_case(Case::Constant))
}

/// Field named by a getter method, if `method` is one.
///
/// Both `get_first_name` (with the configured prefix) and `getFirstName`
/// resolve to `first_name`.
#[must_use]
pub fn getter_property(method: &str, prefix: &str) -> Option<String> {
    if let Some(rest) = method.strip_prefix(prefix).filter(|r| !r.is_empty()) {
        return Some(rest.to_case(Case::Snake));
    }

    let rest = method.strip_prefix("get")?;
    rest.starts_with(char::is_uppercase)
        .then(|| rest.to_case(Case::Snake))
}

/// Identifier for generated code; rejects anything that cannot be one.
pub fn ident(name: &str) -> Result<Ident, BuildError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric());

    if valid {
        Ok(Ident::new(name, Span::call_site()))
    } else {
        Err(BuildError::InvalidPath(name.to_string()))
    }
}
