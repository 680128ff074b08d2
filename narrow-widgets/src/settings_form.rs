//! Admin-facing settings form for the widget.
//!
//! Builds the narrowing and limit elements, reads submitted values back
//! into [`WidgetSettings`] and describes stored settings in one line each.

use crate::catalog::BundleCatalog;
use crate::field::FieldDefinition;
use crate::host::{SelectionPlugins, Translator};
use crate::settings::{parse_limit, HandlerConfig, WidgetSettings, DIRECT_HANDLER};
use narrow_types::{is_empty_value, BundleId, FormNode, NodeKind, SelectOption, SlotKey};
use serde_json::{json, Value};
use tracing::{debug, warn};

pub struct SettingsFormBuilder<'a> {
    field: &'a FieldDefinition,
    catalog: &'a BundleCatalog,
    plugins: &'a dyn SelectionPlugins,
    translator: &'a dyn Translator,
}

impl<'a> SettingsFormBuilder<'a> {
    pub fn new(
        field: &'a FieldDefinition,
        catalog: &'a BundleCatalog,
        plugins: &'a dyn SelectionPlugins,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            field,
            catalog,
            plugins,
            translator,
        }
    }

    /// Settings elements to merge into the host's widget settings form.
    ///
    /// Narrowing elements appear only when the field references more than
    /// one bundle; limit inputs only when its cardinality is not unlimited.
    pub fn build(&self, settings: &WidgetSettings) -> FormNode {
        let mut form = FormNode::new(NodeKind::Container);

        if self.catalog.can_narrow() {
            let mut checkbox = FormNode::new(NodeKind::Checkbox)
                .with_title(self.t("Display bundle narrowing", &[]))
                .with_default_value(json!(settings.show_bundle_selector));
            checkbox.description = Some(self.t(
                "Show a bundle selector next to each value that narrows the autocomplete to one bundle.",
                &[],
            ));
            form.insert_child("show_bundle_selector", checkbox);
            form.insert_child("handlers", self.handlers_element(settings));
        }

        if self.field.limits_apply() {
            form.insert_child(
                "min",
                self.limit_input(
                    "Minimum",
                    "The minimum number of values that should be allowed in this field. Leave blank for no minimum.",
                    settings.min.map(|n| n.get()),
                ),
            );
            form.insert_child(
                "max",
                self.limit_input(
                    "Maximum",
                    "The maximum number of values that should be allowed in this field. Leave blank for no maximum.",
                    settings.max.map(|n| n.get()),
                ),
            );
        }
        form
    }

    /// Reads submitted settings values back into settings.
    ///
    /// Handlers may arrive either as the form's `view_and_display` choice or
    /// already split into `view_name`/`display_name`. Entries for bundles
    /// the field cannot reference are dropped.
    pub fn submit(&self, values: &Value) -> WidgetSettings {
        let mut settings = WidgetSettings {
            min: values.get("min").and_then(parse_limit),
            max: values.get("max").and_then(parse_limit),
            show_bundle_selector: values
                .get("show_bundle_selector")
                .is_some_and(|v| !is_empty_value(v)),
            ..WidgetSettings::default()
        };

        if let Some(Value::Object(handlers)) = values.get("handlers") {
            for (raw_bundle, raw) in handlers {
                let Ok(bundle) = BundleId::parse(raw_bundle) else {
                    continue;
                };
                settings.handlers.insert(bundle, Self::parse_handler(raw));
            }
        }
        let submitted = settings.handlers.len();
        settings.retain_handlers(self.catalog.referenceable_bundles());
        if settings.handlers.len() < submitted {
            debug!(
                field = %self.field.name,
                dropped = submitted - settings.handlers.len(),
                "dropping handlers for unreferenceable bundles"
            );
        }

        if settings.bounds_conflict() {
            warn!(
                field = %self.field.name,
                min = ?settings.min,
                max = ?settings.max,
                "minimum exceeds maximum; the field can never validate"
            );
        }
        settings
    }

    /// One-line descriptions of the active settings.
    pub fn summary(&self, settings: &WidgetSettings) -> Vec<String> {
        let mut lines = Vec::new();
        if self.field.limits_apply() {
            if let Some(min) = settings.min {
                lines.push(self.t("Minimum values: @number", &[("@number", min.to_string())]));
            }
            if let Some(max) = settings.max {
                lines.push(self.t("Maximum values: @number", &[("@number", max.to_string())]));
            }
        }
        if self.catalog.can_narrow() {
            for (bundle, handler) in self.catalog.handlers(settings) {
                if handler.is_direct() {
                    continue;
                }
                let mut args = vec![
                    ("@bundle", bundle.to_string()),
                    ("@view", handler.view_name.clone()),
                    ("@display", handler.display_name.clone()),
                ];
                let line = match handler.arguments.as_deref() {
                    Some(arguments) => {
                        args.push(("@arguments", arguments.to_string()));
                        self.t("@bundle: view @view (@display) with arguments @arguments", &args)
                    }
                    None => self.t("@bundle: view @view (@display)", &args),
                };
                lines.push(line);
            }
        }
        lines
    }

    fn handlers_element(&self, settings: &WidgetSettings) -> FormNode {
        let mut details = FormNode::new(NodeKind::Details)
            .with_title(self.t("Bundle selection handlers", &[]));
        details.tree = true;

        let template = self.view_template();
        for (bundle, handler) in self.catalog.handlers(settings) {
            let mut group = template.clone();
            group.kind = NodeKind::Fieldset;
            group.title = Some(bundle.to_string());
            if let Some(choice) = group.child_mut(&SlotKey::named("view_and_display")) {
                choice.default_value = Some(json!(handler.view_and_display()));
            }
            if let Some(arguments) = group.child_mut(&SlotKey::named("arguments")) {
                arguments.default_value = handler.arguments.clone().map(Value::String);
                arguments.required = false;
            }
            details.insert_child(bundle.as_str(), group);
        }
        details
    }

    /// The view selection plugin's `view` sub-form with the extra
    /// "no view" choice, or a bare replacement when the plugin offers none.
    fn view_template(&self) -> FormNode {
        let plugin_form = self.plugins.view_selection_form(self.field.target_type.as_str());
        let mut template = match plugin_form.child(&SlotKey::named("view")) {
            Some(view) => view.clone(),
            None => {
                warn!(target_type = %self.field.target_type, "view selection form has no view element");
                FormNode::new(NodeKind::Container)
                    .with_child("view_and_display", FormNode::new(NodeKind::Select))
                    .with_child("arguments", FormNode::new(NodeKind::Textfield))
            }
        };

        let no_view = self.t("Don't use view selection", &[]);
        if let Some(choice) = template.child_mut(&SlotKey::named("view_and_display")) {
            if !choice.options.iter().any(|o| o.value == DIRECT_HANDLER) {
                choice.options.push(SelectOption::new(DIRECT_HANDLER, no_view));
            }
        }
        template
    }

    fn limit_input(&self, title: &str, description: &str, current: Option<u32>) -> FormNode {
        let mut input = FormNode::new(NodeKind::Number)
            .with_title(self.t(title, &[]))
            .with_default_value(current.map_or(Value::Null, |n| json!(n)));
        input.description = Some(self.t(description, &[]));
        input
    }

    fn parse_handler(raw: &Value) -> HandlerConfig {
        let arguments = raw
            .get("arguments")
            .and_then(Value::as_str)
            .map(str::to_string);
        match raw.get("view_and_display").and_then(Value::as_str) {
            Some(choice) => HandlerConfig::from_view_and_display(choice, arguments),
            None => serde_json::from_value(raw.clone()).unwrap_or_default(),
        }
    }

    fn t(&self, template: &str, args: &[(&str, String)]) -> String {
        self.translator.translate(template, args)
    }
}
