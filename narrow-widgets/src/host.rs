//! Interfaces to the host's form and metadata services.
//!
//! The widget never looks services up globally; a host passes them in.
//! The in-memory implementations here back the CLI and the tests, and are
//! enough for hosts that already hold submitted values as JSON.

use crate::error::Result;
use narrow_types::{insert_at, lookup, BundleId, FormNode, FormPath, ReferenceId, ViewSelection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Request-scoped view of the form being processed.
pub trait FormState {
    /// Submitted value at `path`, if present.
    fn value(&self, path: &FormPath) -> Option<&Value>;

    /// Records a validation error against the element named by `path`.
    fn set_error(&mut self, path: &FormPath, message: String);

    /// Whether validation errors are suppressed for this pass (partial
    /// submissions such as "add another item" or a bundle refresh).
    fn limit_validation_errors(&self) -> bool;

    /// Asks the host to rebuild the form on the next request.
    fn set_rebuild(&mut self, rebuild: bool);

    /// Array parents of the element that triggered the current request.
    fn triggering_element(&self) -> Option<&FormPath>;
}

/// Display metadata for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMeta {
    pub label: String,
}

/// Bundle metadata lookup.
pub trait BundleInfo: Send + Sync {
    fn bundle_info(&self, target_type: &str) -> HashMap<BundleId, BundleMeta>;
}

/// Builds configuration sub-forms of the host's selection plugins.
pub trait SelectionPlugins: Send + Sync {
    /// The view-based selection plugin's configuration form for
    /// `target_type`. Expected to contain a `view` child with
    /// `view_and_display` and `arguments` inputs.
    fn view_selection_form(&self, target_type: &str) -> FormNode;
}

/// A record offered to the user by the reference input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ReferenceId,
    pub label: String,
    #[serde(default)]
    pub bundle: Option<BundleId>,
}

/// Executes candidate searches for the reference input.
///
/// Text matching is the host's business; the widget only chooses which of
/// the two searches runs and with which restriction.
pub trait CandidateSource: Send + Sync {
    /// Searches `target_type`, limited to `bundles` when given.
    fn search_bundles(
        &self,
        target_type: &str,
        bundles: Option<&[BundleId]>,
        text: &str,
        limit: usize,
    ) -> Vec<Candidate>;

    /// Runs the named view display with its contextual arguments.
    fn execute_view(
        &self,
        target_type: &str,
        view: &ViewSelection,
        text: &str,
        limit: usize,
    ) -> Vec<Candidate>;
}

/// Translation of user-facing strings with `@name` placeholders.
pub trait Translator: Send + Sync {
    fn translate(&self, template: &str, args: &[(&str, String)]) -> String;
}

/// Substitutes placeholders without translating.
///
/// Placeholders are replaced in one pass over the template, so substituted
/// values are never scanned for further placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, template: &str, args: &[(&str, String)]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(pos) = rest.find('@') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            // Longest name wins so `@label` never shadows `@labels`.
            let hit = args
                .iter()
                .filter(|(name, _)| !name.is_empty() && tail.starts_with(*name))
                .max_by_key(|(name, _)| name.len());
            match hit {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('@');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Bundle metadata from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleInfo {
    bundles: HashMap<String, HashMap<BundleId, BundleMeta>>,
}

impl StaticBundleInfo {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bundle(mut self, target_type: &str, id: &str, label: &str) -> Self {
        self.bundles.entry(target_type.to_string()).or_default().insert(
            BundleId::new(id),
            BundleMeta {
                label: label.to_string(),
            },
        );
        self
    }
}

impl BundleInfo for StaticBundleInfo {
    fn bundle_info(&self, target_type: &str) -> HashMap<BundleId, BundleMeta> {
        self.bundles.get(target_type).cloned().unwrap_or_default()
    }
}

/// Form state backed by a JSON value tree.
///
/// The first error recorded for a path wins, as hosts keep only one
/// message per element.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormState {
    values: Value,
    errors: Vec<(FormPath, String)>,
    limit_validation_errors: bool,
    rebuild: bool,
    triggering_element: Option<FormPath>,
}

impl MemoryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: Value) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, path: &FormPath, value: Value) -> Result<()> {
        insert_at(&mut self.values, path, value)?;
        Ok(())
    }

    pub fn set_limit_validation_errors(&mut self, limit: bool) {
        self.limit_validation_errors = limit;
    }

    pub fn set_triggering_element(&mut self, array_parents: FormPath) {
        self.triggering_element = Some(array_parents);
    }

    #[must_use]
    pub fn values(&self) -> &Value {
        &self.values
    }

    #[must_use]
    pub fn errors(&self) -> &[(FormPath, String)] {
        &self.errors
    }

    #[must_use]
    pub fn error_for(&self, path: &FormPath) -> Option<&str> {
        self.errors
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn rebuild_requested(&self) -> bool {
        self.rebuild
    }
}

impl FormState for MemoryFormState {
    fn value(&self, path: &FormPath) -> Option<&Value> {
        lookup(&self.values, path)
    }

    fn set_error(&mut self, path: &FormPath, message: String) {
        if self.error_for(path).is_none() {
            self.errors.push((path.clone(), message));
        }
    }

    fn limit_validation_errors(&self) -> bool {
        self.limit_validation_errors
    }

    fn set_rebuild(&mut self, rebuild: bool) {
        self.rebuild = rebuild;
    }

    fn triggering_element(&self) -> Option<&FormPath> {
        self.triggering_element.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substituted_values_are_not_rescanned() {
        let out = PassthroughTranslator.translate(
            "@a then @b",
            &[("@a", "@b".to_string()), ("@b", "x".to_string())],
        );
        assert_eq!(out, "@b then x");
    }

    #[test]
    fn longest_placeholder_wins() {
        let out = PassthroughTranslator.translate(
            "@label/@labels",
            &[("@label", "one".to_string()), ("@labels", "many".to_string())],
        );
        assert_eq!(out, "one/many");
    }

    #[test]
    fn unknown_placeholders_stay() {
        assert_eq!(
            PassthroughTranslator.translate("mail @user at @host", &[("@user", "kim".to_string())]),
            "mail kim at @host"
        );
    }
}
