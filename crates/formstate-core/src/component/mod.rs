//! View components the form drives: field components, user-facing
//! messages and the identifier-change subscription registry.
mod field;
mod listener;
mod message;

#[cfg(test)]
mod tests;

pub use field::{FieldComponent, FieldContent, FieldSnapshot, FieldState};
pub use listener::{
    EntityIdChangeListener, FieldHandle, ListenerHandle, ListenerRegistry, Subscriber,
};
pub use message::{Message, MessageKind};
