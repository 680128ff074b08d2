use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::num::NonZeroU32;

/// Storage-level bound on how many values a field may hold.
///
/// Serialized as an integer where `-1` means unlimited, which is the
/// encoding hosts use in field storage definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Unlimited,
    Limited(NonZeroU32),
}

impl Cardinality {
    /// Raw value hosts use for unlimited cardinality.
    pub const UNLIMITED: i64 = -1;

    /// A single-valued field.
    pub const SINGLE: Self = Self::Limited(NonZeroU32::MIN);

    /// Decodes the host's integer encoding.
    pub fn from_raw(raw: i64) -> Result<Self, Error> {
        if raw == Self::UNLIMITED {
            return Ok(Self::Unlimited);
        }
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self::Limited)
            .ok_or(Error::InvalidCardinality(raw))
    }

    #[must_use]
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Unlimited => Self::UNLIMITED,
            Self::Limited(n) => i64::from(n.get()),
        }
    }

    #[must_use]
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl Serialize for Cardinality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for Cardinality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}
