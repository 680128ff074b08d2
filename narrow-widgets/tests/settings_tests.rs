use narrow_types::BundleId;
use narrow_widgets::{HandlerConfig, ReferenceNarrowWidget, WidgetSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn defaults_have_no_limits_and_no_selector() {
    let settings = ReferenceNarrowWidget::default_settings();
    assert_eq!(settings.min, None);
    assert_eq!(settings.max, None);
    assert!(!settings.show_bundle_selector);
    assert!(settings.handlers.is_empty());
    assert!(!settings.has_limits());
}

#[test]
fn missing_handler_defaults_to_direct() {
    let settings = WidgetSettings::default();
    let handler = settings.handler_for(&BundleId::new("article"));
    assert!(handler.is_direct());
    assert_eq!(handler, HandlerConfig::direct());
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn json_decoding_is_lenient() {
    let settings = WidgetSettings::from_json(&json!({
        "min": "2",
        "max": "",
        "show_bundle_selector": 1,
        "handlers": {
            "event": {"view_name": "events", "display_name": "upcoming", "arguments": "12/all"},
            "article": {"view_name": "default", "display_name": "", "arguments": null},
        }
    }))
    .unwrap();

    assert_eq!(settings.min.map(|n| n.get()), Some(2));
    assert_eq!(settings.max, None);
    assert!(settings.show_bundle_selector);
    assert!(settings.handler_for(&BundleId::new("article")).is_direct());

    let event = settings.handler_for(&BundleId::new("event"));
    assert_eq!(event.view_name, "events");
    assert_eq!(event.argument_list(), vec!["12", "all"]);
}

#[test]
fn zero_limit_means_unset() {
    let settings = WidgetSettings::from_json(&json!({"min": 0, "max": null})).unwrap();
    assert!(!settings.has_limits());
}

#[test]
fn toml_decoding() {
    let settings = WidgetSettings::from_toml_str(
        r#"
min = 1
max = 4
show_bundle_selector = true

[handlers.page]
view_name = "pages"
display_name = "by_section"
arguments = "news"
"#,
    )
    .unwrap();

    assert_eq!(settings.min.map(|n| n.get()), Some(1));
    assert_eq!(settings.max.map(|n| n.get()), Some(4));
    let page = settings.handler_for(&BundleId::new("page"));
    assert_eq!(page.view_and_display(), "pages.by_section");
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(WidgetSettings::from_toml_str("min = [").is_err());
}

#[test]
fn json_roundtrip() {
    let settings = WidgetSettings::default()
        .with_limits(Some(2), Some(5))
        .with_bundle_selector(true)
        .with_handler(
            BundleId::new("event"),
            HandlerConfig::view("events", "upcoming", Some("a/b".into())),
        );
    let value = settings.to_json().unwrap();
    assert_eq!(WidgetSettings::from_json(&value).unwrap(), settings);
}

// ── HandlerConfig ────────────────────────────────────────────────

#[test]
fn view_and_display_parsing() {
    let handler = HandlerConfig::from_view_and_display("related.entity_reference_1", None);
    assert_eq!(handler.view_name, "related");
    assert_eq!(handler.display_name, "entity_reference_1");
    assert!(!handler.is_direct());

    for choice in ["default", "", "novalue", ".display", "view."] {
        assert!(HandlerConfig::from_view_and_display(choice, None).is_direct(), "{choice}");
    }
}

#[test]
fn blank_arguments_are_dropped() {
    let handler = HandlerConfig::view("v", "d", Some("   ".into()));
    assert_eq!(handler.arguments, None);
    assert!(handler.argument_list().is_empty());
}

#[test]
fn argument_list_skips_empty_segments() {
    let handler = HandlerConfig::view("v", "d", Some("/a// b /".into()));
    assert_eq!(handler.argument_list(), vec!["a", "b"]);
    assert_eq!(handler.to_view_selection().arguments, vec!["a", "b"]);
}

#[test]
fn direct_handler_presents_as_default_choice() {
    assert_eq!(HandlerConfig::direct().view_and_display(), "default");
}

// ── Bounds ───────────────────────────────────────────────────────

#[test]
fn bounds_conflict_only_when_min_exceeds_max() {
    assert!(WidgetSettings::default().with_limits(Some(5), Some(2)).bounds_conflict());
    assert!(!WidgetSettings::default().with_limits(Some(2), Some(2)).bounds_conflict());
    assert!(!WidgetSettings::default().with_limits(Some(5), None).bounds_conflict());
}

#[test]
fn retain_handlers_drops_unknown_bundles() {
    let mut settings = WidgetSettings::default()
        .with_handler(BundleId::new("article"), HandlerConfig::direct())
        .with_handler(BundleId::new("gone"), HandlerConfig::view("v", "d", None));
    settings.retain_handlers(&[BundleId::new("article")]);
    assert_eq!(settings.handlers.len(), 1);
}

// ── Files ────────────────────────────────────────────────────────

#[test]
fn load_from_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = WidgetSettings::load_from(&dir.path().join("absent.toml"));
    assert_eq!(settings, WidgetSettings::default());
}

#[test]
fn load_from_broken_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget.toml");
    std::fs::write(&path, "max = {").unwrap();
    assert_eq!(WidgetSettings::load_from(&path), WidgetSettings::default());
    assert!(WidgetSettings::read(&path).is_err());
}

#[test]
fn read_picks_format_by_extension() {
    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(json_file, r#"{{"max": 3}}"#).unwrap();
    let settings = WidgetSettings::read(json_file.path()).unwrap();
    assert_eq!(settings.max.map(|n| n.get()), Some(3));

    let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(toml_file, "min = 2").unwrap();
    let settings = WidgetSettings::read(toml_file.path()).unwrap();
    assert_eq!(settings.min.map(|n| n.get()), Some(2));
}
