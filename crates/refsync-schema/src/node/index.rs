use crate::prelude::*;
use std::{
    fmt::{self, Display},
    ops::Not,
};

///
/// IndexKey
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexKey {
    pub field: String,

    #[serde(default)]
    pub direction: IndexDirection,
}

impl IndexKey {
    #[must_use]
    pub fn new(field: &str, direction: IndexDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

///
/// IndexSpec
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexSpec {
    pub keys: Vec<IndexKey>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub background: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub sparse: bool,

    /// Zero or negative means "never expire".
    #[serde(default)]
    pub expire_after_seconds: i64,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub hidden: bool,
}

impl IndexSpec {
    #[must_use]
    pub fn on(keys: &[(&str, IndexDirection)]) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|(field, direction)| IndexKey::new(field, *direction))
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn is_compound(&self) -> bool {
        self.keys.len() > 1
    }
}

impl Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self
            .keys
            .iter()
            .map(|k| format!("{} {}", k.field, k.direction))
            .collect::<Vec<_>>()
            .join(", ");

        if self.unique {
            write!(f, "UNIQUE ({keys})")
        } else {
            write!(f, "({keys})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_keys_with_direction() {
        let index = IndexSpec::on(&[
            ("last_name", IndexDirection::Asc),
            ("created", IndexDirection::Desc),
        ])
        .unique();

        assert_eq!(index.to_string(), "UNIQUE (last_name Asc, created Desc)");
        assert!(index.is_compound());
    }

    #[test]
    fn options_default_when_absent() {
        let index: IndexSpec =
            serde_json::from_str(r#"{"keys": [{"field": "email"}]}"#).unwrap();

        assert_eq!(index.keys[0].direction, IndexDirection::Asc);
        assert!(!index.unique);
        assert!(index.name.is_empty());
        assert_eq!(index.expire_after_seconds, 0);
    }
}
