//! Entity accessor boundary.
//!
//! The form never talks to storage directly; every lookup, save and delete
//! crosses this trait. Validation failures come back as annotated entities,
//! never as `Err`.
use crate::{
    entity::{Entity, EntityId},
    model::EntityModel,
};
use std::rc::Rc;
use thiserror::Error as ThisError;

///
/// EntityAccessor
///
/// Persistence contract for one entity model.
///

pub trait EntityAccessor {
    /// Field metadata for the accessed entity.
    fn model(&self) -> &EntityModel;

    fn get(&self, id: EntityId) -> Result<Option<Entity>, AccessError>;

    /// Persist a record, returning the (possibly corrected) stored copy.
    /// An invalid return value carries the validation messages.
    fn save(&self, entity: Entity) -> Result<Entity, AccessError>;

    fn delete(&self, id: EntityId) -> Result<(), AccessError>;
}

impl<T: EntityAccessor + ?Sized> EntityAccessor for &T {
    fn model(&self) -> &EntityModel {
        (**self).model()
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>, AccessError> {
        (**self).get(id)
    }

    fn save(&self, entity: Entity) -> Result<Entity, AccessError> {
        (**self).save(entity)
    }

    fn delete(&self, id: EntityId) -> Result<(), AccessError> {
        (**self).delete(id)
    }
}

impl<T: EntityAccessor + ?Sized> EntityAccessor for Rc<T> {
    fn model(&self) -> &EntityModel {
        (**self).model()
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>, AccessError> {
        (**self).get(id)
    }

    fn save(&self, entity: Entity) -> Result<Entity, AccessError> {
        (**self).save(entity)
    }

    fn delete(&self, id: EntityId) -> Result<(), AccessError> {
        (**self).delete(id)
    }
}

///
/// AccessError
///
/// Non-validation persistence failures.
///

#[derive(Debug, ThisError)]
pub enum AccessError {
    /// Lock acquisition failed; the caller may retry the whole request.
    #[error("concurrent modification of {entity}: {message}")]
    Contention { entity: String, message: String },

    #[error("{entity} record {id} not found")]
    NotFound { entity: String, id: EntityId },

    #[error("store failure on {entity}: {message}")]
    Store { entity: String, message: String },
}

impl AccessError {
    pub fn contention(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Contention {
            entity: entity.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention { .. })
    }
}
