//! Per-slot bundle narrowing.
//!
//! Each value slot gets a companion select listing the referenceable
//! bundles. The slot's active bundle decides how the reference input finds
//! candidates: either a direct restriction to that bundle, or a view
//! display configured for it. Changing the select triggers a partial
//! refresh that re-renders the reference input with its value cleared.
//!
//! Resolution order for the active bundle:
//! 1. the bundle submitted for the slot (a refresh or a failed validation
//!    round-trip),
//! 2. the bundle of the record the slot currently references,
//! 3. the first referenceable bundle.

use crate::catalog::BundleCatalog;
use crate::error::{Result, WidgetError};
use crate::field::{FieldDefinition, FieldInstance};
use crate::host::{BundleInfo, FormState};
use crate::settings::WidgetSettings;
use narrow_types::{
    AjaxMethod, AjaxProgress, AjaxTrigger, BundleId, FormNode, FormPath, NodeKind,
    ProgressKind, SelectOption, SelectionHandler, SelectionSettings, SlotKey,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Key of the companion select inside a slot.
pub const BUNDLE_KEY: &str = "bundle";

/// Callback name the host routes the companion select's refresh to.
pub const REFRESH_CALLBACK: &str = "narrow_widgets.refresh_bundle";

/// Class that lays the select and the reference input out side by side.
pub const INLINE_CLASS: &str = "form--inline";

/// Where a slot's active bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Submitted,
    Referenced,
    CatalogDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotBundleState {
    /// No bundle can be chosen (empty catalog).
    Unresolved,
    Resolved {
        bundle: BundleId,
        source: ResolutionSource,
    },
}

impl SlotBundleState {
    #[must_use]
    pub fn bundle(&self) -> Option<&BundleId> {
        match self {
            Self::Unresolved => None,
            Self::Resolved { bundle, .. } => Some(bundle),
        }
    }
}

/// Per-request inputs for rendering one slot.
#[derive(Clone, Copy)]
pub struct SlotContext<'a> {
    pub field_parents: &'a FormPath,
    pub delta: usize,
    pub items: &'a FieldInstance,
    pub state: &'a dyn FormState,
}

pub struct BundleSelector<'a> {
    field: &'a FieldDefinition,
    settings: &'a WidgetSettings,
    catalog: &'a BundleCatalog,
    bundle_info: &'a dyn BundleInfo,
    primary_key: &'a str,
}

impl<'a> BundleSelector<'a> {
    pub fn new(
        field: &'a FieldDefinition,
        settings: &'a WidgetSettings,
        catalog: &'a BundleCatalog,
        bundle_info: &'a dyn BundleInfo,
        primary_key: &'a str,
    ) -> Self {
        Self {
            field,
            settings,
            catalog,
            bundle_info,
            primary_key,
        }
    }

    /// The selector is rendered whenever the field has a choice of bundles.
    /// `show_bundle_selector` is stored configuration only.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.catalog.can_narrow()
    }

    /// Submitted-value path of the slot's companion select.
    #[must_use]
    pub fn bundle_path(&self, field_parents: &FormPath, delta: usize) -> FormPath {
        field_parents
            .child(self.field.name.as_str())
            .child(delta)
            .child(BUNDLE_KEY)
    }

    /// DOM id of the region wrapping the slot's reference input.
    #[must_use]
    pub fn wrapper_id(&self, field_parents: &FormPath, delta: usize) -> String {
        format!("{}-{delta}-type", self.bundle_path(field_parents, delta).joined("-"))
    }

    pub fn resolve(&self, ctx: &SlotContext<'_>) -> SlotBundleState {
        let submitted = ctx
            .state
            .value(&self.bundle_path(ctx.field_parents, ctx.delta))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(BundleId::new);
        if let Some(bundle) = submitted {
            if self.catalog.contains(&bundle) {
                return SlotBundleState::Resolved {
                    bundle,
                    source: ResolutionSource::Submitted,
                };
            }
            warn!(
                field = %self.field.name,
                delta = ctx.delta,
                bundle = %bundle,
                "submitted bundle is not referenceable, ignoring"
            );
        }

        if let Some(bundle) = ctx
            .items
            .referenced_bundle(ctx.delta)
            .filter(|b| self.catalog.contains(b))
        {
            return SlotBundleState::Resolved {
                bundle: bundle.clone(),
                source: ResolutionSource::Referenced,
            };
        }

        match self.catalog.first() {
            Some(bundle) => SlotBundleState::Resolved {
                bundle: bundle.clone(),
                source: ResolutionSource::CatalogDefault,
            },
            None => SlotBundleState::Unresolved,
        }
    }

    /// Wraps a slot element in a fieldset with the companion select and
    /// narrows its reference input to the resolved bundle.
    ///
    /// Inactive selectors hand the element back untouched.
    #[must_use]
    pub fn render(&self, element: FormNode, ctx: &SlotContext<'_>) -> FormNode {
        if !self.is_active() {
            return element;
        }
        let SlotBundleState::Resolved { bundle, source } = self.resolve(ctx) else {
            return element;
        };
        debug!(
            field = %self.field.name,
            delta = ctx.delta,
            bundle = %bundle,
            ?source,
            "resolved slot bundle"
        );

        let input_key = SlotKey::named(self.primary_key);
        let wrapper_id = self.wrapper_id(ctx.field_parents, ctx.delta);

        let mut fieldset = FormNode::new(NodeKind::Fieldset);
        fieldset.title = element.child(&input_key).and_then(|input| input.title.clone());
        fieldset.classes = vec![INLINE_CLASS.to_string()];
        fieldset.insert_child(BUNDLE_KEY, self.selector(&bundle, &wrapper_id));
        let mut fieldset = fieldset.absorb(element);

        let Some(input) = fieldset.child_mut(&input_key) else {
            warn!(field = %self.field.name, delta = ctx.delta, "slot has no reference input");
            return fieldset;
        };
        input.title_hidden = true;
        self.apply_handler(input, &bundle);
        input.prefix = Some(format!("<div id='{wrapper_id}'>"));
        input.suffix = Some("</div>".to_string());

        let stored = ctx.items.referenced_bundle(ctx.delta);
        if stored.is_some_and(|b| *b != bundle) {
            debug!(
                field = %self.field.name,
                delta = ctx.delta,
                bundle = %bundle,
                "reference belongs to another bundle, clearing"
            );
            input.clear_value();
        }
        fieldset
    }

    /// Points the reference input's candidate search at `bundle`.
    pub fn apply_handler(&self, input: &mut FormNode, bundle: &BundleId) {
        let handler = self.settings.handler_for(bundle);
        let selection = input
            .selection
            .get_or_insert_with(|| SelectionSettings::new(self.field.target_type.as_str()));

        if handler.is_direct() {
            selection.handler = SelectionHandler::Default;
            selection.view = None;
            selection.target_bundles = Some(vec![bundle.clone()]);
        } else {
            debug!(
                bundle = %bundle,
                view = %handler.view_name,
                display = %handler.display_name,
                "delegating candidate search to view"
            );
            selection.handler = SelectionHandler::Views;
            selection.target_bundles = None;
            selection.view = Some(handler.to_view_selection());
        }
    }

    /// Refresh callback for the companion select.
    ///
    /// Locates the slot from the triggering select's array parents, clears
    /// the slot's reference input and returns it as the replacement
    /// fragment. The form is flagged for rebuild so the next render narrows
    /// the input to the newly chosen bundle.
    pub fn refresh(&self, form: &FormNode, state: &mut dyn FormState) -> Result<FormNode> {
        let trigger = state
            .triggering_element()
            .cloned()
            .ok_or(WidgetError::MissingTrigger)?;
        let slot_path = trigger
            .parent()
            .ok_or_else(|| WidgetError::ElementNotFound(trigger.clone()))?;
        let input_path = slot_path.child(self.primary_key);

        let mut input = form
            .descendant(&input_path)
            .cloned()
            .ok_or(WidgetError::ElementNotFound(input_path))?;
        input.clear_value();
        state.set_rebuild(true);
        Ok(input)
    }

    fn selector(&self, bundle: &BundleId, wrapper_id: &str) -> FormNode {
        let mut select = FormNode::new(NodeKind::Select);
        select.options = self
            .catalog
            .options(self.bundle_info)
            .into_iter()
            .map(SelectOption::from)
            .collect();
        select.default_value = Some(Value::String(bundle.to_string()));
        select.ajax = Some(AjaxTrigger {
            callback: REFRESH_CALLBACK.to_string(),
            event: "change".to_string(),
            wrapper: wrapper_id.to_string(),
            method: AjaxMethod::Replace,
            progress: AjaxProgress {
                kind: ProgressKind::Throbber,
                message: None,
            },
        });
        select
    }
}
