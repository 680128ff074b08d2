//! Commands behind the `narrow-widgets` operator binary.
//!
//! Each command reads its inputs from files and returns a report; printing
//! and exit codes are left to `main`.

use anyhow::{Context, Result};
use narrow_types::{FormNode, FormPath, NodeKind};
use narrow_widgets::host::{
    MemoryFormState, PassthroughTranslator, SelectionPlugins, StaticBundleInfo,
};
use narrow_widgets::{
    decorate_title, BundleCatalog, FieldDefinition, MultiplicityValidator, SettingsFormBuilder,
    ValidationError, WidgetSettings, PRIMARY_VALUE_KEY,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of `check-settings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsReport {
    pub settings: Value,
    /// Summary lines; empty when no field definition was supplied.
    pub summary: Vec<String>,
    pub bounds_conflict: bool,
}

/// Outcome of `validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub field: String,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The CLI never renders settings forms, so no view plugin is needed.
struct NoSelectionPlugins;

impl SelectionPlugins for NoSelectionPlugins {
    fn view_selection_form(&self, _target_type: &str) -> FormNode {
        FormNode::new(NodeKind::Container)
    }
}

pub fn read_settings(path: &Path) -> Result<WidgetSettings> {
    WidgetSettings::read(path)
        .with_context(|| format!("failed to read widget settings from {}", path.display()))
}

pub fn read_field(path: &Path) -> Result<FieldDefinition> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read field definition {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid field definition in {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Parses a `/`-separated parents argument (`inline_entity/0`).
#[must_use]
pub fn parse_parents(raw: Option<&str>) -> FormPath {
    raw.map(|s| s.split('/').filter(|k| !k.is_empty()).collect())
        .unwrap_or_default()
}

/// Normalizes a settings file and, given the field it configures, describes
/// it the way the settings summary does.
pub fn check_settings(settings_path: &Path, field_path: Option<&Path>) -> Result<SettingsReport> {
    let settings = read_settings(settings_path)?;
    let summary = match field_path {
        Some(path) => {
            let field = read_field(path)?;
            let catalog = BundleCatalog::from_field(&field);
            let unknown: Vec<_> = settings
                .handlers
                .keys()
                .filter(|b| !catalog.contains(b))
                .collect();
            if !unknown.is_empty() {
                warn!(field = %field.name, ?unknown, "handlers configured for unreferenceable bundles");
            }
            SettingsFormBuilder::new(&field, &catalog, &NoSelectionPlugins, &PassthroughTranslator)
                .summary(&settings)
        }
        None => Vec::new(),
    };

    let bounds_conflict = settings.bounds_conflict();
    if bounds_conflict {
        warn!(min = ?settings.min, max = ?settings.max, "minimum exceeds maximum");
    }
    Ok(SettingsReport {
        settings: settings.to_json().context("failed to encode settings")?,
        summary,
        bounds_conflict,
    })
}

/// Runs the limit validator against a submitted-values file.
///
/// `parents` locates the field inside the submitted tree when the widget
/// is embedded in another form.
pub fn validate(
    settings_path: &Path,
    field_path: &Path,
    submitted_path: &Path,
    parents: &FormPath,
) -> Result<ValidationReport> {
    let settings = read_settings(settings_path)?;
    let field = read_field(field_path)?;
    let submitted = read_json(submitted_path)?;
    debug!(field = %field.name, parents = %parents, "validating submission");

    let mut state = MemoryFormState::with_values(submitted);
    let errors = MultiplicityValidator::new(&field, &settings, PRIMARY_VALUE_KEY, &PassthroughTranslator)
        .validate(parents, &mut state);
    Ok(ValidationReport {
        field: field.name,
        errors,
    })
}

/// Decorates `title` with the limits from a settings file. A missing or
/// unreadable file leaves the title as it is.
#[must_use]
pub fn label(settings_path: &Path, title: &str) -> String {
    decorate_title(title, &WidgetSettings::load_from(settings_path))
}

/// Bundle labels for a field, as the companion selector would list them.
/// Metadata comes from an optional `{bundle: label}` JSON file.
pub fn bundle_options(field_path: &Path, labels_path: Option<&Path>) -> Result<Vec<(String, String)>> {
    let field = read_field(field_path)?;
    let mut info = StaticBundleInfo::new();
    if let Some(path) = labels_path {
        if let Value::Object(labels) = read_json(path)? {
            for (id, label) in labels {
                let label = label.as_str().unwrap_or(id.as_str()).to_string();
                info = info.with_bundle(&field.target_type, &id, &label);
            }
        }
    }
    Ok(BundleCatalog::from_field(&field)
        .options(&info)
        .into_iter()
        .map(|o| (o.id.to_string(), o.label))
        .collect())
}
