//! Shared type definitions for the narrow widgets.
//!
//! This crate holds the host-agnostic vocabulary that the widget components
//! exchange with a form-processing host:
//! - Bundle and reference identifiers
//! - Slot keys and form paths (the positional addressing of form trees)
//! - The [`FormNode`] tree that describes a rendered form element
//! - Storage cardinality
//! - Helpers for reading submitted values out of JSON form state
//!
//! Nothing in here knows about min/max limits or bundle narrowing; that
//! behaviour lives in `narrow-widgets`.

mod cardinality;
mod ids;
mod node;
mod path;
mod value;

pub use cardinality::Cardinality;
pub use ids::{BundleId, ReferenceId};
pub use node::{
    AjaxMethod, AjaxProgress, AjaxTrigger, FormNode, NodeKind, ProgressKind, SelectOption,
    SelectionHandler, SelectionSettings, ViewSelection,
};
pub use path::{FormPath, SlotKey};
pub use value::{insert_at, is_empty_value, lookup, ordinal_slots};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or decoding shared types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid cardinality: {0}")]
    InvalidCardinality(i64),

    #[error("cannot write below a scalar at {0}")]
    NotAContainer(FormPath),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
