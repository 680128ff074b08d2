//! Shared test helpers for widget tests.

#![allow(dead_code)]

use narrow_types::{
    BundleId, Cardinality, FormNode, FormPath, NodeKind, ReferenceId, SelectOption,
    ViewSelection,
};
use narrow_widgets::host::{
    Candidate, CandidateSource, PassthroughTranslator, SelectionPlugins, StaticBundleInfo,
};
use narrow_widgets::{FieldDefinition, FieldInstance, ReferenceNarrowWidget, Services, WidgetSettings};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A three-valued field referencing `node` articles, pages and events.
pub fn related_field() -> FieldDefinition {
    FieldDefinition::new("field_related", "Related content", "node")
        .with_cardinality(Cardinality::from_raw(3).unwrap())
        .with_target_bundles(&["article", "page", "event"])
}

pub fn single_bundle_field() -> FieldDefinition {
    FieldDefinition::new("field_related", "Related content", "node")
        .with_cardinality(Cardinality::from_raw(3).unwrap())
        .with_target_bundles(&["article"])
}

pub fn bundle_info() -> StaticBundleInfo {
    StaticBundleInfo::new()
        .with_bundle("node", "article", "Article")
        .with_bundle("node", "page", "Basic page")
        .with_bundle("node", "event", "Event")
}

/// View selection plugin whose form mirrors what hosts ship.
pub struct StaticSelectionPlugins;

impl SelectionPlugins for StaticSelectionPlugins {
    fn view_selection_form(&self, _target_type: &str) -> FormNode {
        let mut choice = FormNode::new(NodeKind::Select).with_title("View used to select the entities");
        choice.options = vec![
            SelectOption::new("related.entity_reference_1", "Related: Reference"),
            SelectOption::new("events.upcoming", "Events: Upcoming"),
        ];
        choice.required = true;
        let mut arguments = FormNode::new(NodeKind::Textfield).with_title("View arguments");
        arguments.required = true;

        FormNode::new(NodeKind::Container).with_child(
            "view",
            FormNode::new(NodeKind::Container)
                .with_child("view_and_display", choice)
                .with_child("arguments", arguments),
        )
    }
}

/// Selection plugin that offers no `view` element.
pub struct EmptySelectionPlugins;

impl SelectionPlugins for EmptySelectionPlugins {
    fn view_selection_form(&self, _target_type: &str) -> FormNode {
        FormNode::new(NodeKind::Container)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Bundles {
        target_type: String,
        bundles: Option<Vec<BundleId>>,
        text: String,
    },
    View {
        target_type: String,
        view: ViewSelection,
        text: String,
    },
}

/// Candidate source that records each call and answers with `results`.
#[derive(Default)]
pub struct RecordingCandidateSource {
    pub calls: Mutex<Vec<SourceCall>>,
    pub results: Vec<Candidate>,
}

impl RecordingCandidateSource {
    pub fn returning(results: Vec<Candidate>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            results,
        }
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl CandidateSource for RecordingCandidateSource {
    fn search_bundles(
        &self,
        target_type: &str,
        bundles: Option<&[BundleId]>,
        text: &str,
        _limit: usize,
    ) -> Vec<Candidate> {
        self.calls.lock().unwrap().push(SourceCall::Bundles {
            target_type: target_type.to_string(),
            bundles: bundles.map(<[BundleId]>::to_vec),
            text: text.to_string(),
        });
        self.results.clone()
    }

    fn execute_view(
        &self,
        target_type: &str,
        view: &ViewSelection,
        text: &str,
        _limit: usize,
    ) -> Vec<Candidate> {
        self.calls.lock().unwrap().push(SourceCall::View {
            target_type: target_type.to_string(),
            view: view.clone(),
            text: text.to_string(),
        });
        self.results.clone()
    }
}

pub fn candidate(id: u64, label: &str, bundle: &str) -> Candidate {
    Candidate {
        id: ReferenceId::from(id),
        label: label.to_string(),
        bundle: Some(BundleId::new(bundle)),
    }
}

pub fn services() -> Services {
    Services::new(
        Arc::new(bundle_info()),
        Arc::new(StaticSelectionPlugins),
        Arc::new(PassthroughTranslator),
    )
}

pub fn widget(field: FieldDefinition, settings: WidgetSettings) -> ReferenceNarrowWidget {
    init_tracing();
    ReferenceNarrowWidget::new(field, settings, services())
}

/// A rendered slot as the host's base autocomplete widget produces it.
pub fn slot_element(field_parents: &FormPath, value: Option<&str>) -> FormNode {
    let mut input = FormNode::new(NodeKind::Autocomplete).with_title("Related content");
    input.default_value = value.map(|v| serde_json::Value::String(v.to_string()));
    input.selection = Some(
        narrow_types::SelectionSettings::new("node").with_target_bundles(vec![
            BundleId::new("article"),
            BundleId::new("page"),
            BundleId::new("event"),
        ]),
    );
    let mut element = FormNode::new(NodeKind::Container).with_child("target_id", input);
    element.field_parents = field_parents.clone();
    element
}

/// Stored items: slot 0 references article 11, slot 1 references page 12.
pub fn stored_items() -> FieldInstance {
    FieldInstance::new(Cardinality::from_raw(3).unwrap())
        .with_reference(ReferenceId::from(11), Some(BundleId::new("article")))
        .with_reference(ReferenceId::from(12), Some(BundleId::new("page")))
}

pub fn path(keys: &[&str]) -> FormPath {
    keys.iter().copied().collect()
}
