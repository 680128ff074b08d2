//! The composed "Autocomplete (Narrower)" widget.

use crate::add_more::{AddMoreController, ADD_MORE_KEY};
use crate::bundle_selector::{BundleSelector, SlotContext};
use crate::catalog::BundleCatalog;
use crate::error::Result;
use crate::field::{FieldDefinition, FieldInstance};
use crate::host::{BundleInfo, Candidate, CandidateSource, FormState, SelectionPlugins, Translator};
use crate::label::decorate_title;
use crate::multiplicity::{MultiplicityValidator, ValidationError};
use crate::selection::CandidateLookup;
use crate::settings::WidgetSettings;
use crate::settings_form::SettingsFormBuilder;
use narrow_types::{FormNode, SlotKey};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const WIDGET_ID: &str = "reference_narrow_widget";

/// Key of the reference input inside each slot.
pub const PRIMARY_VALUE_KEY: &str = "target_id";

/// Validator name attached to the widget element.
pub const VALIDATE_HOOK: &str = "narrow_widgets.validate_multiplicity";

/// Host services the widget depends on.
#[derive(Clone)]
pub struct Services {
    pub bundle_info: Arc<dyn BundleInfo>,
    pub selection_plugins: Arc<dyn SelectionPlugins>,
    pub translator: Arc<dyn Translator>,
}

impl Services {
    pub fn new(
        bundle_info: Arc<dyn BundleInfo>,
        selection_plugins: Arc<dyn SelectionPlugins>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            bundle_info,
            selection_plugins,
            translator,
        }
    }
}

/// Reference autocomplete widget with value limits and bundle narrowing.
///
/// Each method corresponds to one host hook; the widget itself holds no
/// per-request state.
pub struct ReferenceNarrowWidget {
    field: FieldDefinition,
    settings: WidgetSettings,
    catalog: BundleCatalog,
    services: Services,
}

impl ReferenceNarrowWidget {
    pub fn new(field: FieldDefinition, settings: WidgetSettings, services: Services) -> Self {
        let catalog = BundleCatalog::from_field(&field);
        debug!(
            field = %field.name,
            bundles = catalog.referenceable_bundles().len(),
            "widget configured"
        );
        Self {
            field,
            settings,
            catalog,
            services,
        }
    }

    /// Settings a fresh widget instance starts with.
    #[must_use]
    pub fn default_settings() -> WidgetSettings {
        WidgetSettings::default()
    }

    #[must_use]
    pub fn field(&self) -> &FieldDefinition {
        &self.field
    }

    #[must_use]
    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &BundleCatalog {
        &self.catalog
    }

    pub fn settings_form(&self) -> FormNode {
        self.settings_builder().build(&self.settings)
    }

    pub fn submit_settings_form(&self, values: &Value) -> WidgetSettings {
        self.settings_builder().submit(values)
    }

    pub fn settings_summary(&self) -> Vec<String> {
        self.settings_builder().summary(&self.settings)
    }

    /// Widget-level build hook: attaches the limit validator and adds the
    /// limits to the title.
    #[must_use]
    pub fn form(&self, mut widget: FormNode) -> FormNode {
        if !widget.validators.iter().any(|v| v == VALIDATE_HOOK) {
            widget.validators.push(VALIDATE_HOOK.to_string());
        }
        if let Some(title) = widget.title.as_deref() {
            widget.title = Some(decorate_title(title, &self.settings));
        }
        widget
    }

    /// Repeatable-group post-process hook.
    #[must_use]
    pub fn form_multiple_elements(&self, elements: FormNode) -> FormNode {
        AddMoreController::new(&self.settings).adjust(elements, &SlotKey::named(ADD_MORE_KEY))
    }

    /// Per-slot render hook.
    #[must_use]
    pub fn form_element(
        &self,
        element: FormNode,
        items: &FieldInstance,
        delta: usize,
        state: &dyn FormState,
    ) -> FormNode {
        let field_parents = element.field_parents.clone();
        let ctx = SlotContext {
            field_parents: &field_parents,
            delta,
            items,
            state,
        };
        self.bundle_selector().render(element, &ctx)
    }

    /// Element-validate hook for the widget element.
    pub fn validate_element(
        &self,
        element: &FormNode,
        state: &mut dyn FormState,
    ) -> Vec<ValidationError> {
        self.validator().validate(&element.field_parents, state)
    }

    /// Refresh callback of the companion bundle select.
    pub fn refresh_bundle(&self, form: &FormNode, state: &mut dyn FormState) -> Result<FormNode> {
        self.bundle_selector().refresh(form, state)
    }

    /// Candidate search for a (narrowed) reference input.
    pub fn candidates(
        &self,
        input: &FormNode,
        source: &dyn CandidateSource,
        text: &str,
        limit: usize,
    ) -> Vec<Candidate> {
        CandidateLookup::new(source).lookup(input, text, limit)
    }

    pub fn validator(&self) -> MultiplicityValidator<'_> {
        MultiplicityValidator::new(
            &self.field,
            &self.settings,
            PRIMARY_VALUE_KEY,
            self.services.translator.as_ref(),
        )
    }

    pub fn bundle_selector(&self) -> BundleSelector<'_> {
        BundleSelector::new(
            &self.field,
            &self.settings,
            &self.catalog,
            self.services.bundle_info.as_ref(),
            PRIMARY_VALUE_KEY,
        )
    }

    fn settings_builder(&self) -> SettingsFormBuilder<'_> {
        SettingsFormBuilder::new(
            &self.field,
            &self.catalog,
            self.services.selection_plugins.as_ref(),
            self.services.translator.as_ref(),
        )
    }
}
