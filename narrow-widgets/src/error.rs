//! Error types for the narrow widgets.
//!
//! Limit violations are not errors in this sense: they are reported as
//! [`ValidationError`](crate::ValidationError) values through form state.

use narrow_types::FormPath;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings TOML: {0}")]
    SettingsToml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("form state has no triggering element")]
    MissingTrigger,

    #[error("no form element at {0}")]
    ElementNotFound(FormPath),

    #[error(transparent)]
    Types(#[from] narrow_types::Error),
}
