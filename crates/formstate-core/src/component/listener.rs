use crate::{component::FieldComponent, entity::EntityId, error::InternalError};
use std::{cell::RefCell, rc::Rc};

///
/// EntityIdChangeListener
///
/// Subscriber notified synchronously whenever the identifier of the record a
/// component edits changes.
///

pub trait EntityIdChangeListener {
    fn on_entity_id_change(&mut self, id: Option<EntityId>) -> Result<(), InternalError>;
}

/// Shared handle to a field-capable subscriber.
pub type FieldHandle = Rc<RefCell<dyn FieldComponent>>;

/// Shared handle to any other subscriber.
pub type ListenerHandle = Rc<RefCell<dyn EntityIdChangeListener>>;

///
/// Subscriber
///
/// Registration entry. Capability is declared up front so binding never has
/// to inspect a listener's concrete type.
///

pub enum Subscriber {
    Field { name: String, component: FieldHandle },
    Other { name: String, listener: ListenerHandle },
}

impl Subscriber {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::Other { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn as_field(&self) -> Option<&FieldHandle> {
        match self {
            Self::Field { component, .. } => Some(component),
            Self::Other { .. } => None,
        }
    }

    fn notify(&self, id: Option<EntityId>) -> Result<(), InternalError> {
        let busy = || {
            InternalError::form_invariant(format!(
                "subscriber '{}' is borrowed during notification",
                self.name()
            ))
        };

        match self {
            Self::Field { component, .. } => component
                .try_borrow_mut()
                .map_err(|_| busy())?
                .on_entity_id_change(id),
            Self::Other { listener, .. } => listener
                .try_borrow_mut()
                .map_err(|_| busy())?
                .on_entity_id_change(id),
        }
    }
}

///
/// ListenerRegistry
///
/// Ordered identifier-change subscribers of one component, keyed by name.
///

#[derive(Default)]
pub struct ListenerRegistry {
    subscribers: Vec<Subscriber>,
}

impl ListenerRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber, replacing any earlier one with the same name.
    pub fn register(&mut self, subscriber: Subscriber) {
        match self
            .subscribers
            .iter_mut()
            .find(|existing| existing.name() == subscriber.name())
        {
            Some(existing) => *existing = subscriber,
            None => self.subscribers.push(subscriber),
        }
    }

    pub fn subscribe_field(&mut self, name: impl Into<String>, component: FieldHandle) {
        self.register(Subscriber::Field {
            name: name.into(),
            component,
        });
    }

    pub fn subscribe(&mut self, name: impl Into<String>, listener: ListenerHandle) {
        self.register(Subscriber::Other {
            name: name.into(),
            listener,
        });
    }

    #[must_use]
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Push an identifier change to every subscriber in registration order.
    pub fn notify(&self, id: Option<EntityId>) -> Result<(), InternalError> {
        for subscriber in &self.subscribers {
            subscriber.notify(id)?;
        }

        Ok(())
    }
}
