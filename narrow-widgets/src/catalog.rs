//! Referenceable bundles of a field.

use crate::field::FieldDefinition;
use crate::host::BundleInfo;
use crate::settings::{HandlerConfig, WidgetSettings};
use narrow_types::{BundleId, SelectOption};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A bundle as offered by the companion selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOption {
    pub id: BundleId,
    pub label: String,
}

impl From<BundleOption> for SelectOption {
    fn from(option: BundleOption) -> Self {
        SelectOption::new(option.id.to_string(), option.label)
    }
}

/// Ordered list of bundles a field may reference.
///
/// Order follows the field's bundle restriction; the first entry is the
/// fallback when nothing else decides a slot's bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleCatalog {
    target_type: String,
    bundles: Vec<BundleId>,
}

impl BundleCatalog {
    /// Reads the bundle restriction from the field's selection settings.
    ///
    /// A selection mechanism without a `target_bundles` entry cannot be
    /// narrowed and yields an empty catalog. The restriction may be stored
    /// as a keyed map (`{article: article}`) or a plain list.
    pub fn from_field(field: &FieldDefinition) -> Self {
        let bundles = match field.handler_settings.get("target_bundles") {
            Some(Value::Object(map)) => map.keys().map(BundleId::new).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(BundleId::new)
                .collect(),
            _ => {
                debug!(field = %field.name, "selection settings expose no bundle restriction");
                Vec::new()
            }
        };
        Self {
            target_type: field.target_type.clone(),
            bundles,
        }
    }

    #[must_use]
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    #[must_use]
    pub fn referenceable_bundles(&self) -> &[BundleId] {
        &self.bundles
    }

    /// Narrowing only makes sense with a choice of more than one bundle.
    #[must_use]
    pub fn can_narrow(&self) -> bool {
        self.bundles.len() > 1
    }

    #[must_use]
    pub fn first(&self) -> Option<&BundleId> {
        self.bundles.first()
    }

    #[must_use]
    pub fn contains(&self, bundle: &BundleId) -> bool {
        self.bundles.contains(bundle)
    }

    /// Selector options with labels from `info`; a bundle without metadata
    /// is labelled with its id.
    pub fn options(&self, info: &dyn BundleInfo) -> Vec<BundleOption> {
        let meta = info.bundle_info(&self.target_type);
        self.bundles
            .iter()
            .map(|id| BundleOption {
                id: id.clone(),
                label: meta
                    .get(id)
                    .map_or_else(|| id.to_string(), |m| m.label.clone()),
            })
            .collect()
    }

    /// Every bundle with its effective handler.
    pub fn handlers<'a>(
        &'a self,
        settings: &'a WidgetSettings,
    ) -> impl Iterator<Item = (&'a BundleId, HandlerConfig)> + 'a {
        self.bundles
            .iter()
            .map(move |bundle| (bundle, settings.handler_for(bundle)))
    }
}
