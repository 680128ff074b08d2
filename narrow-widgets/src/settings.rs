//! Widget settings: value limits, the bundle selector flag and per-bundle
//! candidate handlers.
//!
//! Settings come from the host's configuration store as JSON, or from a
//! `*.toml` file for headless use. Decoding is lenient the same way form
//! submissions are: numbers may arrive as strings, and an empty or zero
//! limit means "no limit".

use crate::error::{Result, WidgetError};
use narrow_types::{is_empty_value, BundleId, ViewSelection};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;
use tracing::{info, warn};

/// View name that means "restrict directly to the bundle".
pub const DIRECT_HANDLER: &str = "default";

/// Candidate filter for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub view_name: String,
    #[serde(default)]
    pub display_name: String,
    /// Slash-separated contextual arguments passed to the view.
    #[serde(
        default,
        deserialize_with = "lenient_arguments",
        skip_serializing_if = "Option::is_none"
    )]
    pub arguments: Option<String>,
}

impl HandlerConfig {
    /// Direct bundle restriction, no delegated view.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            view_name: DIRECT_HANDLER.to_string(),
            display_name: String::new(),
            arguments: None,
        }
    }

    /// Delegates filtering to `view_name.display_name`.
    pub fn view(
        view_name: impl Into<String>,
        display_name: impl Into<String>,
        arguments: Option<String>,
    ) -> Self {
        Self {
            view_name: view_name.into(),
            display_name: display_name.into(),
            arguments: arguments.filter(|a| !a.trim().is_empty()),
        }
    }

    /// Parses the settings form's combined `"view.display"` choice.
    ///
    /// `"default"`, an empty string, or a value without a display part all
    /// fall back to direct restriction.
    pub fn from_view_and_display(choice: &str, arguments: Option<String>) -> Self {
        match choice.trim().split_once('.') {
            Some((view, display)) if !view.is_empty() && !display.is_empty() => {
                Self::view(view, display, arguments)
            }
            _ => Self::direct(),
        }
    }

    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.view_name == DIRECT_HANDLER
    }

    /// The combined choice as the settings form presents it.
    #[must_use]
    pub fn view_and_display(&self) -> String {
        if self.is_direct() || self.display_name.is_empty() {
            DIRECT_HANDLER.to_string()
        } else {
            format!("{}.{}", self.view_name, self.display_name)
        }
    }

    /// Splits `arguments` on `/`, dropping blank segments.
    #[must_use]
    pub fn argument_list(&self) -> Vec<String> {
        self.arguments
            .as_deref()
            .unwrap_or_default()
            .split('/')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn to_view_selection(&self) -> ViewSelection {
        ViewSelection {
            view_name: self.view_name.clone(),
            display_name: self.display_name.clone(),
            arguments: self.argument_list(),
        }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::direct()
    }
}

/// Configuration of one widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    #[serde(deserialize_with = "lenient_limit")]
    pub min: Option<NonZeroU32>,
    #[serde(deserialize_with = "lenient_limit")]
    pub max: Option<NonZeroU32>,
    #[serde(deserialize_with = "lenient_bool")]
    pub show_bundle_selector: bool,
    pub handlers: BTreeMap<BundleId, HandlerConfig>,
}

impl WidgetSettings {
    /// Builder-style setter for both limits.
    #[must_use]
    pub fn with_limits(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min = min.and_then(NonZeroU32::new);
        self.max = max.and_then(NonZeroU32::new);
        self
    }

    #[must_use]
    pub fn with_bundle_selector(mut self, show: bool) -> Self {
        self.show_bundle_selector = show;
        self
    }

    #[must_use]
    pub fn with_handler(mut self, bundle: BundleId, handler: HandlerConfig) -> Self {
        self.handlers.insert(bundle, handler);
        self
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads settings from a file, choosing JSON for `*.json` and TOML
    /// otherwise.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WidgetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Like [`read`](Self::read), but a missing or broken file yields the
    /// defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No widget settings at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                info!("Loaded widget settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "Failed to load widget settings {:?}: {}. Falling back to defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// The handler for `bundle`, or direct restriction when none is stored.
    #[must_use]
    pub fn handler_for(&self, bundle: &BundleId) -> HandlerConfig {
        self.handlers.get(bundle).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn has_limits(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether both limits are set and the minimum exceeds the maximum.
    /// Such settings are accepted as-is; callers may only warn.
    #[must_use]
    pub fn bounds_conflict(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    /// Drops handler entries for bundles outside `bundles`.
    pub fn retain_handlers(&mut self, bundles: &[BundleId]) {
        self.handlers.retain(|bundle, _| bundles.contains(bundle));
    }
}

/// Interprets a submitted or stored limit.
///
/// Positive integers (or their string form) are limits; `null`, `""`, zero,
/// negatives, fractions and anything else mean "unset".
#[must_use]
pub fn parse_limit(value: &Value) -> Option<NonZeroU32> {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().and_then(NonZeroU32::new)
}

fn lenient_limit<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<NonZeroU32>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(parse_limit))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.is_some_and(|v| !is_empty_value(&v)))
}

fn lenient_arguments<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    let joined = match raw {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    Ok(Some(joined).filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_limit_accepts_numeric_strings() {
        assert_eq!(parse_limit(&json!("3")).map(NonZeroU32::get), Some(3));
        assert_eq!(parse_limit(&json!(" 7 ")).map(NonZeroU32::get), Some(7));
    }

    #[test]
    fn parse_limit_rejects_unset_forms() {
        for v in [json!(null), json!(""), json!(0), json!("0"), json!(-2), json!(1.5), json!(true)] {
            assert_eq!(parse_limit(&v), None, "{v}");
        }
    }

    #[test]
    fn parse_limit_accepts_whole_floats() {
        assert_eq!(parse_limit(&json!(4.0)).map(NonZeroU32::get), Some(4));
    }

    #[test]
    fn arguments_array_is_joined() {
        let handler: HandlerConfig =
            serde_json::from_value(json!({"view_name": "v", "display_name": "d", "arguments": ["a", 2]}))
                .unwrap();
        assert_eq!(handler.arguments.as_deref(), Some("a/2"));
    }
}
