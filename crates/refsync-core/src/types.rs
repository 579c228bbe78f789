use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// ObjectIdError
///

#[derive(Debug, PartialEq, ThisError)]
pub enum ObjectIdError {
    #[error("invalid object id hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("object id must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

///
/// ObjectId
///
/// Conventional 12-byte identifier of entities deriving from the
/// entity-with-id base. Displayed and parsed as lowercase hex.
///

type ObjectIdBytes = [u8; 12];

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(ObjectIdBytes);

impl ObjectId {
    pub const LEN: usize = 12;

    #[must_use]
    pub const fn new(bytes: ObjectIdBytes) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> ObjectIdBytes {
        self.0
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub const fn dummy(v: u8) -> Self {
        Self([v; 12])
    }

    /// Build from a 4-byte timestamp and an 8-byte counter, big-endian.
    #[must_use]
    pub fn from_parts(timestamp: u32, counter: u64) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..].copy_from_slice(&counter.to_be_bytes());

        Self(bytes)
    }

    pub fn parse_hex(source: &str) -> Result<Self, ObjectIdError> {
        let bytes = hex::decode(source)?;
        let actual = bytes.len();
        let array = ObjectIdBytes::try_from(bytes).map_err(|_| ObjectIdError::Length {
            expected: Self::LEN,
            actual,
        })?;

        Ok(Self(array))
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}
