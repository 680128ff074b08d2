use narrow_types::{BundleId, Cardinality, ReferenceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The parts of a reference field's definition the widget reads.
///
/// `handler_settings` is owned by whichever selection mechanism the field
/// uses; only its `target_bundles` entry is interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub target_type: String,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub handler_settings: Map<String, Value>,
}

impl FieldDefinition {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            target_type: target_type.into(),
            cardinality: Cardinality::default(),
            handler_settings: Map::new(),
        }
    }

    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Stores `bundles` as the selection mechanism's bundle restriction,
    /// keyed by id the way hosts persist it.
    #[must_use]
    pub fn with_target_bundles(mut self, bundles: &[&str]) -> Self {
        let restriction: Map<String, Value> = bundles
            .iter()
            .map(|b| ((*b).to_string(), Value::String((*b).to_string())))
            .collect();
        self.handler_settings
            .insert("target_bundles".into(), Value::Object(restriction));
        self
    }

    /// Whether min/max limits govern this field. Unlimited storage is left
    /// to the host.
    #[must_use]
    pub fn limits_apply(&self) -> bool {
        !self.cardinality.is_unlimited()
    }
}

/// One value position of a field as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSlot {
    pub delta: usize,
    #[serde(default)]
    pub primary_value: Option<ReferenceId>,
    /// Bundle of the referenced record, when the host could resolve it.
    #[serde(default)]
    pub bundle: Option<BundleId>,
}

impl ValueSlot {
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.primary_value
            .as_ref()
            .is_some_and(|id| !id.as_str().is_empty())
    }
}

/// Stored values of a field for the entity being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstance {
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub slots: Vec<ValueSlot>,
}

impl FieldInstance {
    pub fn new(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            slots: Vec::new(),
        }
    }

    /// Appends a slot referencing `id` of the given bundle at the next delta.
    #[must_use]
    pub fn with_reference(mut self, id: ReferenceId, bundle: Option<BundleId>) -> Self {
        let delta = self.slots.len();
        self.slots.push(ValueSlot {
            delta,
            primary_value: Some(id),
            bundle,
        });
        self
    }

    #[must_use]
    pub fn slot(&self, delta: usize) -> Option<&ValueSlot> {
        self.slots.iter().find(|s| s.delta == delta)
    }

    /// Bundle of the record referenced at `delta`, if any.
    #[must_use]
    pub fn referenced_bundle(&self, delta: usize) -> Option<&BundleId> {
        self.slot(delta)
            .filter(|s| s.is_populated())
            .and_then(|s| s.bundle.as_ref())
    }
}
