//! Positional addressing inside form trees.
//!
//! Form hosts key child elements either by ordinal (the delta of a value
//! slot) or by name (`target_id`, `add_more`, `bundle`). A key string made
//! only of digits in canonical form (`"0"`, `"12"`, but not `"01"`) is an
//! ordinal, matching how hosts round-trip keys through request parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key within a form tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlotKey {
    /// Integer-keyed value slot.
    Ordinal(usize),
    /// Named sub-element.
    Named(String),
}

impl SlotKey {
    /// Creates a named key.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Classifies a raw key string as ordinal or named.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        match canonical.then(|| raw.parse::<usize>().ok()).flatten() {
            Some(n) => Self::Ordinal(n),
            None => Self::Named(raw.to_string()),
        }
    }

    /// Whether this key addresses a value slot.
    #[must_use]
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Self::Ordinal(_))
    }

    /// Returns the ordinal, if this is an ordinal key.
    #[must_use]
    pub fn as_ordinal(&self) -> Option<usize> {
        match self {
            Self::Ordinal(n) => Some(*n),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinal(n) => write!(f, "{n}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<usize> for SlotKey {
    fn from(n: usize) -> Self {
        Self::Ordinal(n)
    }
}

impl From<&str> for SlotKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for SlotKey {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

/// An ordered sequence of keys from a form root to an element.
///
/// `Display` renders the host's error-name format: keys joined by `][`
/// (`field_refs][2][target_id`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPath(Vec<SlotKey>);

impl FormPath {
    /// The empty (root) path.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Appends a key in place.
    pub fn push(&mut self, key: impl Into<SlotKey>) -> &mut Self {
        self.0.push(key.into());
        self
    }

    /// Returns a new path extended by `key`.
    #[must_use]
    pub fn child(&self, key: impl Into<SlotKey>) -> Self {
        let mut next = self.clone();
        next.push(key);
        next
    }

    /// The path without its last key, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    #[must_use]
    pub fn keys(&self) -> &[SlotKey] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the keys with an arbitrary separator.
    #[must_use]
    pub fn joined(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined("]["))
    }
}

impl From<Vec<SlotKey>> for FormPath {
    fn from(keys: Vec<SlotKey>) -> Self {
        Self(keys)
    }
}

impl<K: Into<SlotKey>> FromIterator<K> for FormPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
