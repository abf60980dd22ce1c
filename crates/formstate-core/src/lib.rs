//! Core runtime for formstate: entity models, values, the form component
//! state machine, field components, the wire protocol and the view layer
//! that drives one event per request.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod accessor;
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod expression;
pub mod form;
pub mod model;
pub mod obs;
pub mod store;
pub mod translate;
pub mod value;
pub mod view;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Translation prefix used when a view-specific message key is missing.
pub const CORE_MESSAGE_PREFIX: &str = "core.message";

/// Locale assumed when a view does not declare one.
pub const DEFAULT_LOCALE: &str = "en";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        accessor::EntityAccessor,
        component::{FieldComponent, FieldState, Message, MessageKind},
        entity::{Entity, EntityId},
        form::{FormComponent, FormEvent},
        model::{EntityModel, FieldKind, FieldModel, FieldRules},
        value::Value,
        view::FormView,
    };
}
