//! Caps the repeatable value group at the configured maximum.

use crate::settings::WidgetSettings;
use narrow_types::{FormNode, SlotKey};
use tracing::debug;

/// Key under which hosts render the "add another item" button.
pub const ADD_MORE_KEY: &str = "add_more";

/// Keeps the repeatable group from growing past the maximum.
#[derive(Debug, Clone, Copy)]
pub struct AddMoreController<'a> {
    settings: &'a WidgetSettings,
}

impl<'a> AddMoreController<'a> {
    pub fn new(settings: &'a WidgetSettings) -> Self {
        Self { settings }
    }

    /// Removes the add button once the slot count reaches `max`, and the
    /// extra empty slot a host appends at ordinal `max` when it overshoots.
    #[must_use]
    pub fn adjust(&self, mut elements: FormNode, add_button_key: &SlotKey) -> FormNode {
        let Some(max) = self.settings.max else {
            return elements;
        };
        let max = max.get() as usize;
        let count = elements.ordinal_count();

        if count >= max && elements.remove_child(add_button_key).is_some() {
            debug!(count, max, "limit reached, add button removed");
        }
        if count > max && elements.remove_child(&SlotKey::Ordinal(max)).is_some() {
            debug!(count, max, "over-limit slot removed");
        }
        elements
    }
}
