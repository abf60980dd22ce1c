//! Form component: binds a set of field components to one entity record and
//! drives every entity↔field synchronization through named events.
//!
//! States are implicit in `(entity_id, valid)`:
//! - empty: no identifier bound
//! - bound/valid: identifier bound, last save accepted
//! - bound/invalid: last save rejected (the identifier, if any, is kept)
//!
//! A transition that fails rolls the form and its bound fields back to the
//! state captured before the event, so an accessor failure anywhere in the
//! transition, including inside a subscriber, leaves the tree as rendered.
mod bind;
mod event;
mod wire;

#[cfg(test)]
mod tests;

pub use bind::{FieldBinding, FieldRegistry};
pub use event::FormEvent;
pub use wire::{FormContent, WireError};

use crate::{
    CORE_MESSAGE_PREFIX, DEFAULT_LOCALE,
    accessor::{AccessError, EntityAccessor},
    component::{
        EntityIdChangeListener, FieldHandle, FieldSnapshot, ListenerHandle, ListenerRegistry,
        Message, MessageKind,
    },
    entity::{Entity, EntityId, ErrorMessage},
    error::InternalError,
    obs::{
        EventOutcome, MetricsEvent,
        sink::{Span, record},
    },
    translate::{CodeTranslator, Translate},
    value::Value,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

///
/// FormError
///
/// Failures that abort a transition. Validation failures are not errors;
/// they flip the form invalid and surface as messages.
///

#[derive(Debug, ThisError)]
pub enum FormError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("unknown form event '{0}'")]
    UnknownEvent(String),

    #[error("identifier-change listener failed: {0}")]
    Listener(Box<InternalError>),
}

impl FormError {
    /// True when the whole request may be retried unchanged. Contention
    /// raised by a subscriber (a nested form) counts too.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Access(err) => err.is_retryable(),
            Self::Listener(err) => err.is_conflict(),
            Self::Wire(_) | Self::UnknownEvent(_) => false,
        }
    }
}

///
/// Checkpoint
/// Form and bound-field state a failed transition rolls back to.
///

struct Checkpoint {
    entity_id: Option<EntityId>,
    valid: bool,
    render_requested: bool,
    messages: usize,
    fields: Vec<(FieldHandle, FieldSnapshot)>,
}

///
/// FormComponent
///

pub struct FormComponent<A: EntityAccessor> {
    accessor: A,
    translator: Box<dyn Translate>,
    translation_path: String,
    locale: String,
    expression: String,
    entity_id: Option<EntityId>,
    valid: bool,
    context: BTreeMap<String, JsonValue>,
    messages: Vec<Message>,
    render_requested: bool,
    listeners: ListenerRegistry,
    fields: FieldRegistry,
}

impl<A: EntityAccessor> FormComponent<A> {
    #[must_use]
    pub fn builder(accessor: A) -> FormBuilder<A> {
        FormBuilder::new(accessor)
    }

    #[must_use]
    pub const fn accessor(&self) -> &A {
        &self.accessor
    }

    #[must_use]
    pub const fn entity_id(&self) -> Option<EntityId> {
        self.entity_id
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub const fn context(&self) -> &BTreeMap<String, JsonValue> {
        &self.context
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub const fn render_requested(&self) -> bool {
        self.render_requested
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn translation_path(&self) -> &str {
        &self.translation_path
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    #[must_use]
    pub const fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn add_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.push(Message::new(text, kind));
    }

    /// Bind a new identifier, request a re-render and notify every subscriber.
    pub fn set_entity_id(&mut self, id: Option<EntityId>) -> Result<(), FormError> {
        self.entity_id = id;
        self.render_requested = true;

        self.listeners
            .notify(id)
            .map_err(|err| FormError::Listener(Box::new(err)))
    }

    ///
    /// EVENTS
    ///

    /// Dispatch a named event with its argument list.
    pub fn perform_event(&mut self, name: &str, args: &[String]) -> Result<(), FormError> {
        let event: FormEvent = name.parse()?;

        self.run(event, args)
    }

    pub fn run(&mut self, event: FormEvent, _args: &[String]) -> Result<(), FormError> {
        self.instrumented(event, |form| match event {
            FormEvent::Clear => form.clear_inner(),
            FormEvent::Save => form.save_inner(),
            FormEvent::SaveAndClear => form.save_and_clear_inner(),
            FormEvent::Initialize => form.initialize_inner(),
            FormEvent::Delete => form.delete_inner(),
        })
    }

    /// Reload every bound field from the record; falls back to clear when
    /// the record no longer exists.
    pub fn initialize(&mut self, args: &[String]) -> Result<(), FormError> {
        self.run(FormEvent::Initialize, args)
    }

    pub fn save(&mut self, args: &[String]) -> Result<(), FormError> {
        self.run(FormEvent::Save, args)
    }

    pub fn save_and_clear(&mut self, args: &[String]) -> Result<(), FormError> {
        self.run(FormEvent::SaveAndClear, args)
    }

    pub fn delete(&mut self, args: &[String]) -> Result<(), FormError> {
        self.run(FormEvent::Delete, args)
    }

    pub fn clear(&mut self, args: &[String]) -> Result<(), FormError> {
        self.run(FormEvent::Clear, args)
    }

    /// A parent decided which record this form edits.
    pub fn on_field_entity_id_change(&mut self, id: Option<EntityId>) -> Result<(), FormError> {
        self.instrumented(FormEvent::Initialize, |form| {
            let entity = form.lookup(id)?;
            form.set_entity_id(id)?;
            form.apply_initialize(entity)
        })
    }

    ///
    /// ENTITY VIEWS
    ///

    /// The record this form currently represents: bound identifier, field
    /// values, then context entries for real model fields.
    #[must_use]
    pub fn entity(&self) -> Entity {
        let model = self.accessor.model();
        let mut entity = Entity::for_model(model, self.entity_id);

        self.copy_fields_to_entity(&mut entity);

        for field in &model.fields {
            if let Some(value) = self.context.get(&field.name) {
                entity.set_field(field.name.clone(), Value::from_json(value));
            }
        }

        entity
    }

    /// Fresh copy of the bound record with the current field values applied.
    /// Unbound forms return `entity()`.
    pub fn persisted_entity_with_form_values(&self) -> Result<Entity, FormError> {
        match self.lookup(self.entity_id)? {
            Some(mut entity) => {
                self.copy_fields_to_entity(&mut entity);
                Ok(entity)
            }
            None => Ok(self.entity()),
        }
    }

    /// Push a record produced outside the form (identity, validity, values
    /// and routed errors).
    pub fn set_entity(&mut self, entity: &Entity) -> Result<(), FormError> {
        self.valid = entity.is_valid();
        if !self.valid {
            self.render_requested = true;
            self.copy_global_errors(entity);
        }
        self.copy_entity_to_fields(entity);
        self.set_entity_id(entity.id())?;
        self.set_fields_required_and_disables();

        Ok(())
    }

    ///
    /// TRANSITIONS
    ///

    fn instrumented(
        &mut self,
        event: FormEvent,
        f: impl FnOnce(&mut Self) -> Result<(), FormError>,
    ) -> Result<(), FormError> {
        let path = self.accessor.model().path();
        let mut span = Span::new(event, &path);
        debug!(entity = %path, %event, id = ?self.entity_id, "form event");

        let checkpoint = self.checkpoint();
        let result = f(self);
        if result.is_err() {
            self.rollback(checkpoint);
        }

        match &result {
            Ok(()) => span.set_outcome(if self.valid {
                EventOutcome::Completed
            } else {
                EventOutcome::Rejected
            }),
            Err(err) if err.is_retryable() => {
                record(MetricsEvent::Contention { entity_path: &path });
                warn!(
                    entity = %path, %event, id = ?self.entity_id, error = %err,
                    "form event hit contention"
                );
            }
            Err(err) => {
                warn!(
                    entity = %path, %event, id = ?self.entity_id, error = %err,
                    "form event failed"
                );
            }
        }

        result
    }

    fn checkpoint(&self) -> Checkpoint {
        let fields = self
            .fields
            .iter()
            .map(|binding| {
                let component = binding.component().clone();
                let snapshot = component.borrow().snapshot();
                (component, snapshot)
            })
            .collect();

        Checkpoint {
            entity_id: self.entity_id,
            valid: self.valid,
            render_requested: self.render_requested,
            messages: self.messages.len(),
            fields,
        }
    }

    // Subscribers that are not bound fields keep whatever they accepted
    // before the failure; a nested form rolls itself back.
    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entity_id = checkpoint.entity_id;
        self.valid = checkpoint.valid;
        self.render_requested = checkpoint.render_requested;
        self.messages.truncate(checkpoint.messages);

        for (component, snapshot) in checkpoint.fields {
            component.borrow_mut().restore(snapshot);
        }
    }

    fn initialize_inner(&mut self) -> Result<(), FormError> {
        let entity = self.lookup(self.entity_id)?;

        self.apply_initialize(entity)
    }

    fn apply_initialize(&mut self, entity: Option<Entity>) -> Result<(), FormError> {
        self.copy_default_values_to_fields();

        match entity {
            Some(entity) => {
                self.valid = entity.is_valid();
                self.copy_entity_to_fields(&entity);
                self.set_entity_id(entity.id())?;
            }
            None => {
                if let Some(id) = self.entity_id {
                    let path = self.accessor.model().path();
                    record(MetricsEvent::NotFoundFallback { entity_path: &path });
                    warn!(entity = %path, %id, "bound record not found, clearing form");
                }
                self.clear_inner()?;
            }
        }

        self.set_fields_required_and_disables();

        Ok(())
    }

    fn save_inner(&mut self) -> Result<(), FormError> {
        let entity = self.entity();
        let saved = self.accessor.save(entity)?;

        self.apply_saved(&saved)
    }

    fn apply_saved(&mut self, saved: &Entity) -> Result<(), FormError> {
        let global_errors = if saved.is_valid() {
            0
        } else {
            self.valid = false;
            self.render_requested = true;
            self.copy_global_errors(saved)
        };

        let field_errors = self.copy_entity_to_fields(saved);
        if field_errors + global_errors > 0 {
            let path = self.accessor.model().path();
            record(MetricsEvent::ErrorsRouted {
                entity_path: &path,
                field_errors,
                global_errors,
            });
        }

        if saved.is_valid() {
            self.valid = true;
            self.set_entity_id(saved.id())?;
            let text = self.translate_message("saveMessage");
            self.add_message(text, MessageKind::Success);
        } else {
            let text = self.translate_message("saveFailedMessage");
            self.add_message(text, MessageKind::Failure);
        }

        self.set_fields_required_and_disables();

        Ok(())
    }

    fn save_and_clear_inner(&mut self) -> Result<(), FormError> {
        self.save_inner()?;
        if self.valid {
            self.clear_inner()?;
        }

        Ok(())
    }

    fn delete_inner(&mut self) -> Result<(), FormError> {
        if let Some(id) = self.entity_id {
            self.accessor.delete(id)?;
            let text = self.translate_message("deleteMessage");
            self.add_message(text, MessageKind::Success);
        }

        self.clear_inner()
    }

    fn clear_inner(&mut self) -> Result<(), FormError> {
        for binding in self.fields.iter() {
            binding.component().borrow_mut().set_field_value(None);
        }
        self.valid = true;
        self.set_entity_id(None)?;
        self.set_fields_required_and_disables();

        Ok(())
    }

    ///
    /// SYNCHRONIZATION
    ///

    fn lookup(&self, id: Option<EntityId>) -> Result<Option<Entity>, FormError> {
        match id {
            Some(id) => Ok(self.accessor.get(id)?),
            None => Ok(None),
        }
    }

    fn copy_default_values_to_fields(&self) {
        for binding in self.fields.iter() {
            if let Some(default) = binding.model().default_value() {
                let text = binding.model().to_text(&default);
                binding.component().borrow_mut().set_field_value(Some(text));
            }
        }
    }

    /// Copy record values into fields; a field with an error receives the
    /// message instead of a value. Returns the number of routed errors.
    fn copy_entity_to_fields(&self, entity: &Entity) -> u64 {
        let mut routed = 0;

        for binding in self.fields.iter() {
            let mut component = binding.component().borrow_mut();
            match entity.error(binding.name()) {
                Some(error) => {
                    component.add_message(&self.translate_error(error), MessageKind::Failure);
                    routed += 1;
                }
                None => {
                    let text = binding.model().to_text(entity.field(binding.name()));
                    component.set_field_value(Some(text));
                }
            }
        }

        routed
    }

    fn copy_fields_to_entity(&self, entity: &mut Entity) {
        for binding in self.fields.iter() {
            let value = binding.component().borrow().field_value();
            entity.set_field(binding.name(), value.map_or(Value::Null, Value::Text));
        }
    }

    fn copy_global_errors(&mut self, entity: &Entity) -> u64 {
        let mut routed = 0;

        for error in entity.global_errors() {
            let text = self.translate_error(error);
            self.add_message(text, MessageKind::Failure);
            routed += 1;
        }

        routed
    }

    fn set_fields_required_and_disables(&self) {
        let bound = self.entity_id.is_some();

        for binding in self.fields.iter() {
            let rules = binding.model().rules;
            let mut component = binding.component().borrow_mut();
            component.set_required(rules.is_required(bound));
            component.set_enabled(!rules.is_locked(bound));
        }
    }

    ///
    /// TRANSLATION
    ///

    pub(crate) fn translate(&self, codes: &[String]) -> String {
        self.translator.translate(codes, &self.locale)
    }

    fn translate_message(&self, key: &str) -> String {
        self.translate(&[
            format!("{}.{key}", self.translation_path),
            format!("{CORE_MESSAGE_PREFIX}.{key}"),
        ])
    }

    fn translate_error(&self, error: &ErrorMessage) -> String {
        let mut text = self.translate(std::slice::from_ref(&error.message));
        for (i, var) in error.vars.iter().enumerate() {
            text = text.replace(&format!("{{{i}}}"), var);
        }

        text
    }
}

impl<A: EntityAccessor> EntityIdChangeListener for FormComponent<A> {
    fn on_entity_id_change(&mut self, id: Option<EntityId>) -> Result<(), InternalError> {
        self.on_field_entity_id_change(id).map_err(InternalError::from)
    }
}

///
/// FormBuilder
///
/// Assembles a form and its subscribers; `build` runs the bind phase.
///

pub struct FormBuilder<A: EntityAccessor> {
    accessor: A,
    translator: Box<dyn Translate>,
    translation_path: String,
    locale: String,
    expression: String,
    listeners: ListenerRegistry,
}

impl<A: EntityAccessor> FormBuilder<A> {
    fn new(accessor: A) -> Self {
        let model = accessor.model();
        let translation_path = format!("{}.{}.form", model.namespace, model.entity_name);

        Self {
            accessor,
            translator: Box::new(CodeTranslator),
            translation_path,
            locale: DEFAULT_LOCALE.to_string(),
            expression: String::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    #[must_use]
    pub fn translation_path(mut self, path: impl Into<String>) -> Self {
        self.translation_path = path.into();
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    #[must_use]
    pub fn translator(mut self, translator: impl Translate + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    #[must_use]
    pub fn subscribe_field(mut self, name: impl Into<String>, component: FieldHandle) -> Self {
        self.listeners.subscribe_field(name, component);
        self
    }

    #[must_use]
    pub fn subscribe(mut self, name: impl Into<String>, listener: ListenerHandle) -> Self {
        self.listeners.subscribe(name, listener);
        self
    }

    #[must_use]
    pub fn build(self) -> FormComponent<A> {
        let fields = FieldRegistry::bind(&self.listeners, self.accessor.model());

        FormComponent {
            accessor: self.accessor,
            translator: self.translator,
            translation_path: self.translation_path,
            locale: self.locale,
            expression: self.expression,
            entity_id: None,
            valid: true,
            context: BTreeMap::new(),
            messages: Vec::new(),
            render_requested: false,
            listeners: self.listeners,
            fields,
        }
    }
}
