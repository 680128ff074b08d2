//! The rendered form element tree.
//!
//! A [`FormNode`] carries the element properties the widgets read or
//! rewrite, plus an ordered list of keyed children. Transformations take a
//! node by value and hand back the rewritten tree.

use crate::{BundleId, FormPath, SlotKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The element type a host renders for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Container,
    Fieldset,
    Details,
    Select,
    Checkbox,
    Number,
    Textfield,
    Autocomplete,
    Submit,
    Markup,
}

/// One `value => label` pair of a select element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How the host swaps the refreshed fragment into the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AjaxMethod {
    #[default]
    Replace,
    Append,
    Prepend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    #[default]
    Throbber,
    Bar,
    Fullscreen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjaxProgress {
    pub kind: ProgressKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Partial-refresh wiring attached to an element.
///
/// When `event` fires on the client, the host issues a partial request,
/// invokes `callback` and swaps the returned fragment into the DOM region
/// whose id is `wrapper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjaxTrigger {
    pub callback: String,
    pub event: String,
    pub wrapper: String,
    #[serde(default)]
    pub method: AjaxMethod,
    #[serde(default)]
    pub progress: AjaxProgress,
}

/// Which mechanism computes the candidates of a reference input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionHandler {
    /// Candidate search over the target type, optionally bundle-restricted.
    #[default]
    Default,
    /// Candidates come from a named view display.
    Views,
}

/// A named, parameterized view display used as a candidate filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSelection {
    pub view_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

/// Candidate-filter configuration of a reference input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSettings {
    pub target_type: String,
    #[serde(default)]
    pub handler: SelectionHandler,
    /// Direct bundle restriction. `None` means every bundle of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_bundles: Option<Vec<BundleId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewSelection>,
}

impl SelectionSettings {
    pub fn new(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            ..Self::default()
        }
    }

    /// Restricts candidates to exactly the given bundles.
    #[must_use]
    pub fn with_target_bundles(mut self, bundles: Vec<BundleId>) -> Self {
        self.target_bundles = Some(bundles);
        self
    }
}

/// A form element and its keyed children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormNode {
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub title_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Submitted values keep this node's nesting instead of flattening.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tree: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ajax: Option<AjaxTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Keys of the enclosing entity form that precede the field name.
    #[serde(default, skip_serializing_if = "FormPath::is_empty")]
    pub field_parents: FormPath,
    /// Position of this node in the complete rendered form.
    #[serde(default, skip_serializing_if = "FormPath::is_empty")]
    pub array_parents: FormPath,
    /// Names of element-validate hooks the host runs on submission.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<(SlotKey, FormNode)>,
}

impl FormNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, key: impl Into<SlotKey>, child: FormNode) -> Self {
        self.insert_child(key, child);
        self
    }

    /// Inserts or replaces a child. Replacement keeps the original position.
    pub fn insert_child(&mut self, key: impl Into<SlotKey>, child: FormNode) {
        let key = key.into();
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = child,
            None => self.children.push((key, child)),
        }
    }

    pub fn remove_child(&mut self, key: &SlotKey) -> Option<FormNode> {
        let index = self.children.iter().position(|(k, _)| k == key)?;
        Some(self.children.remove(index).1)
    }

    #[must_use]
    pub fn child(&self, key: &SlotKey) -> Option<&FormNode> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn child_mut(&mut self, key: &SlotKey) -> Option<&mut FormNode> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    #[must_use]
    pub fn has_child(&self, key: &SlotKey) -> bool {
        self.child(key).is_some()
    }

    pub fn children(&self) -> impl Iterator<Item = (&SlotKey, &FormNode)> {
        self.children.iter().map(|(k, c)| (k, c))
    }

    pub fn child_keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.children.iter().map(|(k, _)| k)
    }

    /// Number of integer-keyed children (rendered value slots).
    #[must_use]
    pub fn ordinal_count(&self) -> usize {
        self.child_keys().filter(|k| k.is_ordinal()).count()
    }

    /// Follows `path` down from this node.
    #[must_use]
    pub fn descendant(&self, path: &FormPath) -> Option<&FormNode> {
        path.keys()
            .iter()
            .try_fold(self, |node, key| node.child(key))
    }

    /// Fills every property left unset on `self` from `other` and appends
    /// the children of `other` whose keys `self` does not have yet.
    ///
    /// Properties already present on `self` win, so a wrapper built around
    /// an element keeps its own type, title and classes.
    #[must_use]
    pub fn absorb(mut self, other: FormNode) -> Self {
        let FormNode {
            kind: _,
            title,
            title_hidden,
            description,
            default_value,
            value,
            options,
            required,
            tree,
            ajax,
            selection,
            prefix,
            suffix,
            classes,
            field_parents,
            array_parents,
            validators,
            children,
        } = other;

        self.title = self.title.or(title);
        self.title_hidden |= title_hidden;
        self.description = self.description.or(description);
        self.default_value = self.default_value.or(default_value);
        self.value = self.value.or(value);
        if self.options.is_empty() {
            self.options = options;
        }
        self.required |= required;
        self.tree |= tree;
        self.ajax = self.ajax.or(ajax);
        self.selection = self.selection.or(selection);
        self.prefix = self.prefix.or(prefix);
        self.suffix = self.suffix.or(suffix);
        if self.classes.is_empty() {
            self.classes = classes;
        }
        if self.field_parents.is_empty() {
            self.field_parents = field_parents;
        }
        if self.array_parents.is_empty() {
            self.array_parents = array_parents;
        }
        if self.validators.is_empty() {
            self.validators = validators;
        }
        for (key, child) in children {
            if !self.has_child(&key) {
                self.children.push((key, child));
            }
        }
        self
    }

    /// Clears both the current and the default value.
    pub fn clear_value(&mut self) {
        self.value = None;
        self.default_value = None;
    }
}
