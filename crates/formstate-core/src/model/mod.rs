//! Runtime data model definitions.
//!
//! Types in `model` describe *what exists* on an entity: its fields, their
//! kinds and the create/update rules the form applies to its field
//! components. They are plain data so a view definition can load them from
//! configuration.
mod entity;
mod field;

#[cfg(test)]
mod tests;

pub use entity::EntityModel;
pub use field::{ConvertError, FieldKind, FieldModel, FieldRules};
