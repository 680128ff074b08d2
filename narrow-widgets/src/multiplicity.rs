//! Minimum/maximum value count validation.

use crate::field::FieldDefinition;
use crate::host::{FormState, Translator};
use crate::settings::WidgetSettings;
use narrow_types::{is_empty_value, ordinal_slots, FormPath};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub const MIN_MESSAGE: &str = "The minimum required amount of values for @label is @number.";
pub const MAX_MESSAGE: &str = "The maximum number of values for @label is @number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitViolation {
    BelowMinimum { required: u32, populated: usize },
    AboveMaximum { allowed: u32, populated: usize },
}

/// A user-correctable limit violation, attributed to one form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: FormPath,
    pub violation: LimitViolation,
    pub message: String,
}

/// Counts populated value slots against the configured limits.
pub struct MultiplicityValidator<'a> {
    field: &'a FieldDefinition,
    settings: &'a WidgetSettings,
    primary_key: &'a str,
    translator: &'a dyn Translator,
}

impl<'a> MultiplicityValidator<'a> {
    pub fn new(
        field: &'a FieldDefinition,
        settings: &'a WidgetSettings,
        primary_key: &'a str,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            field,
            settings,
            primary_key,
            translator,
        }
    }

    /// Path of the field's submitted values below `field_parents`.
    #[must_use]
    pub fn field_path(&self, field_parents: &FormPath) -> FormPath {
        field_parents.child(self.field.name.as_str())
    }

    fn is_populated(&self, slot: &Value) -> bool {
        match slot {
            Value::Object(map) => map.get(self.primary_key).is_some_and(|v| !is_empty_value(v)),
            _ => false,
        }
    }

    /// Checks submitted values without consulting form state.
    ///
    /// Errors are attributed to the primary value of the highest-keyed
    /// ordinal slot so that the host shows one message instead of marking
    /// every slot. With no ordinal slots at all, the field path itself is
    /// used.
    pub fn check(&self, field_parents: &FormPath, submitted: Option<&Value>) -> Vec<ValidationError> {
        if !self.field.limits_apply() || !self.settings.has_limits() {
            return Vec::new();
        }

        let field_path = self.field_path(field_parents);
        let slots = submitted.map(ordinal_slots).unwrap_or_default();
        let populated = slots.iter().filter(|(_, slot)| self.is_populated(slot)).count();
        let target = match slots.last() {
            Some((last, _)) => field_path.child(*last).child(self.primary_key),
            None => field_path,
        };

        let mut errors = Vec::new();
        if let Some(min) = self.settings.min.filter(|min| populated < min.get() as usize) {
            errors.push(ValidationError {
                path: target.clone(),
                violation: LimitViolation::BelowMinimum {
                    required: min.get(),
                    populated,
                },
                message: self.message(MIN_MESSAGE, min.get()),
            });
        }
        if let Some(max) = self.settings.max.filter(|max| populated > max.get() as usize) {
            errors.push(ValidationError {
                path: target,
                violation: LimitViolation::AboveMaximum {
                    allowed: max.get(),
                    populated,
                },
                message: self.message(MAX_MESSAGE, max.get()),
            });
        }

        if !errors.is_empty() {
            debug!(
                field = %self.field.name,
                populated,
                errors = errors.len(),
                "value count outside configured limits"
            );
        }
        errors
    }

    /// Element-validate hook: checks the submitted values and records the
    /// errors in form state. Does nothing while errors are suppressed.
    pub fn validate(&self, field_parents: &FormPath, state: &mut dyn FormState) -> Vec<ValidationError> {
        if state.limit_validation_errors() {
            return Vec::new();
        }
        let submitted = state.value(&self.field_path(field_parents)).cloned();
        let errors = self.check(field_parents, submitted.as_ref());
        for error in &errors {
            state.set_error(&error.path, error.message.clone());
        }
        errors
    }

    fn message(&self, template: &str, number: u32) -> String {
        self.translator.translate(
            template,
            &[("@label", self.field.label.clone()), ("@number", number.to_string())],
        )
    }
}
