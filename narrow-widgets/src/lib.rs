//! Reference field widget with multiplicity limits and bundle narrowing.
//!
//! The widget decorates a host's reference ("autocomplete") input with two
//! independent capabilities:
//! - [`MultiplicityValidator`] / [`AddMoreController`] / [`decorate_title`]:
//!   a configurable minimum and maximum number of values for fields whose
//!   storage cardinality is not unlimited
//! - [`BundleSelector`]: a per-slot companion selector that narrows the
//!   reference input to one bundle, either directly or through a named view
//!
//! [`ReferenceNarrowWidget`] composes the components and exposes the hooks a
//! form host calls during build, validation and partial refresh. Host
//! services (form state, bundle metadata, selection plugins, candidate
//! search, translation) are injected through the traits in [`host`].

mod add_more;
mod bundle_selector;
mod catalog;
mod error;
mod field;
pub mod host;
mod label;
mod multiplicity;
mod selection;
mod settings;
mod settings_form;
mod widget;

pub use add_more::{AddMoreController, ADD_MORE_KEY};
pub use bundle_selector::{
    BundleSelector, ResolutionSource, SlotBundleState, SlotContext, BUNDLE_KEY, INLINE_CLASS,
    REFRESH_CALLBACK,
};
pub use catalog::{BundleCatalog, BundleOption};
pub use error::{Result, WidgetError};
pub use field::{FieldDefinition, FieldInstance, ValueSlot};
pub use label::decorate_title;
pub use multiplicity::{
    LimitViolation, MultiplicityValidator, ValidationError, MAX_MESSAGE, MIN_MESSAGE,
};
pub use selection::CandidateLookup;
pub use settings::{parse_limit, HandlerConfig, WidgetSettings, DIRECT_HANDLER};
pub use settings_form::SettingsFormBuilder;
pub use widget::{ReferenceNarrowWidget, Services, PRIMARY_VALUE_KEY, VALIDATE_HOOK, WIDGET_ID};
