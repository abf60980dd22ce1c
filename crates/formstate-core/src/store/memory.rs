use crate::{
    accessor::{AccessError, EntityAccessor},
    entity::{Entity, EntityId, ErrorMessage},
    model::EntityModel,
    store::{MISSING_FIELD_KEY, StoreSnapshot, StoredRow},
    value::Value,
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};
use tracing::debug;

///
/// SaveHook
/// Model-level validator run after field rules; may add field or global errors.
///

pub type SaveHook = Box<dyn Fn(&mut Entity)>;

///
/// MemoryAccessor
///
/// In-process accessor with sequential identifiers.
/// Interior mutability only; one request owns it at a time.
///

pub struct MemoryAccessor {
    model: EntityModel,
    rows: RefCell<BTreeMap<EntityId, Entity>>,
    next_id: Cell<u64>,
    hooks: Vec<SaveHook>,
    contended: Cell<bool>,
    calls: Cell<CallCounts>,
}

///
/// CallCounts
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallCounts {
    pub get: u64,
    pub save: u64,
    pub delete: u64,
}

impl MemoryAccessor {
    #[must_use]
    pub fn new(model: EntityModel) -> Self {
        Self {
            model,
            rows: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            hooks: Vec::new(),
            contended: Cell::new(false),
            calls: Cell::new(CallCounts::default()),
        }
    }

    /// Start identifier assignment at `next`.
    #[must_use]
    pub fn with_next_id(self, next: u64) -> Self {
        self.next_id.set(next);
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: impl Fn(&mut Entity) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Make every following call fail with a contention error until reset.
    pub fn set_contended(&self, contended: bool) {
        self.contended.set(contended);
    }

    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    /// Insert a record as-is, bypassing validation.
    pub fn insert(&self, mut entity: Entity) -> EntityId {
        let id = entity.id().unwrap_or_else(|| self.allocate_id());
        if id.get() >= self.next_id.get() {
            self.next_id.set(id.get() + 1);
        }
        entity.set_id(Some(id));
        entity.clear_errors();
        self.rows.borrow_mut().insert(id, entity);

        id
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let rows = self
            .rows
            .borrow()
            .iter()
            .map(|(id, entity)| StoredRow {
                id: *id,
                fields: entity
                    .fields()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            })
            .collect();

        StoreSnapshot {
            next_id: self.next_id.get(),
            rows,
        }
    }

    /// Rebuild an accessor from a snapshot, coercing values through the model.
    #[must_use]
    pub fn from_snapshot(model: EntityModel, snapshot: &StoreSnapshot) -> Self {
        let accessor = Self::new(model).with_next_id(snapshot.next_id.max(1));

        for row in &snapshot.rows {
            let mut entity = Entity::for_model(&accessor.model, Some(row.id));
            for (name, json) in &row.fields {
                let raw = Value::from_json(json);
                let value = accessor
                    .model
                    .field(name)
                    .and_then(|field| field.coerce(&raw).ok())
                    .unwrap_or(raw);
                entity.set_field(name.clone(), value);
            }
            accessor.insert(entity);
        }

        accessor
    }

    fn allocate_id(&self) -> EntityId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        EntityId::new(id)
    }

    fn count(&self, f: impl FnOnce(&mut CallCounts)) {
        let mut calls = self.calls.get();
        f(&mut calls);
        self.calls.set(calls);
    }

    fn check_contention(&self) -> Result<(), AccessError> {
        if self.contended.get() {
            return Err(AccessError::contention(
                self.model.path(),
                "could not acquire row lock",
            ));
        }

        Ok(())
    }

    // Merge inbound values over the stored row and apply field rules.
    fn normalize(&self, inbound: &Entity, stored: Option<&Entity>) -> Entity {
        let creating = stored.is_none();
        let mut entity = stored.map_or_else(
            || Entity::for_model(&self.model, inbound.id()),
            Clone::clone,
        );
        entity.clear_errors();

        for field in self.model.fields.iter().filter(|f| !f.kind.is_to_many()) {
            if inbound.has_field(&field.name) {
                match field.coerce(inbound.field(&field.name)) {
                    Ok(value) => entity.set_field(field.name.clone(), value),
                    Err(err) => {
                        entity.set_field(field.name.clone(), inbound.field(&field.name).clone());
                        entity.add_error(field.name.clone(), ErrorMessage::new(err.message_key()));
                        continue;
                    }
                }
            }

            if field.rules.is_required(!creating) && entity.field(&field.name).is_blank() {
                entity.add_error(field.name.clone(), ErrorMessage::new(MISSING_FIELD_KEY));
            }
        }

        for error in inbound.global_errors() {
            entity.add_global_error(error.clone());
        }

        entity
    }
}

impl EntityAccessor for MemoryAccessor {
    fn model(&self) -> &EntityModel {
        &self.model
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>, AccessError> {
        self.count(|c| c.get += 1);
        self.check_contention()?;

        Ok(self.rows.borrow().get(&id).cloned())
    }

    fn save(&self, entity: Entity) -> Result<Entity, AccessError> {
        self.count(|c| c.save += 1);
        self.check_contention()?;

        let stored = match entity.id() {
            Some(id) => Some(self.rows.borrow().get(&id).cloned().ok_or_else(|| {
                AccessError::NotFound {
                    entity: self.model.path(),
                    id,
                }
            })?),
            None => None,
        };

        let mut saved = self.normalize(&entity, stored.as_ref());
        for hook in &self.hooks {
            hook(&mut saved);
        }

        if !saved.is_valid() {
            debug!(
                entity = %self.model.path(),
                field_errors = saved.errors().len(),
                global_errors = saved.global_errors().len(),
                "save rejected"
            );
            return Ok(saved);
        }

        let id = saved.id().unwrap_or_else(|| self.allocate_id());
        saved.set_id(Some(id));
        self.rows.borrow_mut().insert(id, saved.clone());
        debug!(entity = %self.model.path(), %id, "saved");

        Ok(saved)
    }

    fn delete(&self, id: EntityId) -> Result<(), AccessError> {
        self.count(|c| c.delete += 1);
        self.check_contention()?;

        match self.rows.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(AccessError::NotFound {
                entity: self.model.path(),
                id,
            }),
        }
    }
}
