//! Field title decoration with the configured value limits.

use crate::settings::WidgetSettings;

/// Appends the configured limits to a field title, e.g.
/// `"Related (min: 2, max: 5)"`. Titles are returned unchanged when no
/// limit is set.
#[must_use]
pub fn decorate_title(title: &str, settings: &WidgetSettings) -> String {
    let parts: Vec<String> = [
        settings.min.map(|min| format!("min: {min}")),
        settings.max.map(|max| format!("max: {max}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({})", parts.join(", "))
    }
}
