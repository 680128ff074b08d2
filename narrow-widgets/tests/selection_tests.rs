mod common;

use common::{candidate, RecordingCandidateSource, SourceCall};
use narrow_types::{BundleId, FormNode, NodeKind, SelectionHandler, SelectionSettings, ViewSelection};
use narrow_widgets::CandidateLookup;
use pretty_assertions::assert_eq;

fn input_with(selection: Option<SelectionSettings>) -> FormNode {
    let mut input = FormNode::new(NodeKind::Autocomplete);
    input.selection = selection;
    input
}

fn events_view() -> ViewSelection {
    ViewSelection {
        view_name: "events".into(),
        display_name: "upcoming".into(),
        arguments: vec!["7".into()],
    }
}

#[test]
fn direct_restriction_searches_bundles() {
    let source = RecordingCandidateSource::returning(vec![candidate(1, "Launch", "article")]);
    let input = input_with(Some(
        SelectionSettings::new("node").with_target_bundles(vec![BundleId::new("article")]),
    ));

    let found = CandidateLookup::new(&source).lookup(&input, "lau", 10);

    assert_eq!(found, vec![candidate(1, "Launch", "article")]);
    assert_eq!(
        source.calls(),
        vec![SourceCall::Bundles {
            target_type: "node".into(),
            bundles: Some(vec![BundleId::new("article")]),
            text: "lau".into(),
        }]
    );
}

#[test]
fn unrestricted_search_passes_no_bundles() {
    let source = RecordingCandidateSource::default();
    let input = input_with(Some(SelectionSettings::new("node")));
    assert!(CandidateLookup::new(&source).lookup(&input, "", 5).is_empty());
    assert_eq!(
        source.calls(),
        vec![SourceCall::Bundles {
            target_type: "node".into(),
            bundles: None,
            text: String::new(),
        }]
    );
}

#[test]
fn view_handler_executes_view() {
    let source = RecordingCandidateSource::returning(vec![candidate(4, "Meetup", "event")]);
    let mut selection = SelectionSettings::new("node");
    selection.handler = SelectionHandler::Views;
    selection.view = Some(events_view());

    let found = CandidateLookup::new(&source).lookup(&input_with(Some(selection)), "meet", 10);

    assert_eq!(found.len(), 1);
    assert_eq!(
        source.calls(),
        vec![SourceCall::View {
            target_type: "node".into(),
            view: events_view(),
            text: "meet".into(),
        }]
    );
}

#[test]
fn view_handler_without_view_offers_nothing() {
    let source = RecordingCandidateSource::returning(vec![candidate(4, "Meetup", "event")]);
    let mut selection = SelectionSettings::new("node");
    selection.handler = SelectionHandler::Views;

    assert!(CandidateLookup::new(&source)
        .lookup(&input_with(Some(selection)), "meet", 10)
        .is_empty());
    assert!(source.calls().is_empty());
}

#[test]
fn input_without_selection_offers_nothing() {
    let source = RecordingCandidateSource::returning(vec![candidate(1, "Launch", "article")]);
    assert!(CandidateLookup::new(&source)
        .lookup(&input_with(None), "l", 10)
        .is_empty());
    assert!(source.calls().is_empty());
}

#[test]
fn results_are_capped_at_limit() {
    let source = RecordingCandidateSource::returning(
        (1..=6).map(|n| candidate(n, "Item", "page")).collect(),
    );
    let input = input_with(Some(SelectionSettings::new("node")));
    assert_eq!(CandidateLookup::new(&source).lookup(&input, "item", 4).len(), 4);
}
