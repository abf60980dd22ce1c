//! View layer: one request drives one event through a form tree.
//!
//! The request envelope carries the event name, its arguments and the
//! client-side state of the form and its fields. The response carries the
//! re-rendered form, every field, and view-level messages.
#[cfg(test)]
mod tests;

use crate::{
    CORE_MESSAGE_PREFIX,
    accessor::EntityAccessor,
    component::{FieldHandle, FieldState, Message},
    config::ViewConfig,
    error::InternalError,
    form::{FormComponent, FormError, FormEvent},
    translate::{CodeTranslator, Translate},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};
use tracing::{debug, warn};

///
/// ViewListener
/// Custom handler run after the built-in event of the same name.
///

pub type ViewListener<A> = Box<dyn Fn(&mut FormComponent<A>, &[String]) -> Result<(), FormError>>;

///
/// ViewRequest
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub event: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub state: ViewState,
}

impl ViewRequest {
    #[must_use]
    pub fn event(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }
}

///
/// ViewState
/// Client-side state: the form frame and one frame per field.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewState {
    pub form: JsonValue,
    pub fields: BTreeMap<String, JsonValue>,
}

///
/// ViewResponse
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ViewResponse {
    pub form: JsonValue,
    pub fields: BTreeMap<String, JsonValue>,
    pub messages: Vec<Message>,
}

///
/// FormView
///

pub struct FormView<A: EntityAccessor> {
    form: FormComponent<A>,
    fields: BTreeMap<String, Rc<RefCell<FieldState>>>,
    listeners: BTreeMap<String, Vec<ViewListener<A>>>,
    messages: Vec<Message>,
}

impl<A: EntityAccessor> FormView<A> {
    #[must_use]
    pub fn from_config(config: &ViewConfig, accessor: A) -> Self {
        Self::from_config_with(config, accessor, CodeTranslator)
    }

    #[must_use]
    pub fn from_config_with(
        config: &ViewConfig,
        accessor: A,
        translator: impl Translate + 'static,
    ) -> Self {
        let mut builder = FormComponent::builder(accessor)
            .translation_path(config.translation_path())
            .locale(&config.locale)
            .expression(&config.expression)
            .translator(translator);
        let mut fields = BTreeMap::new();

        for field in &config.fields {
            let mut state = FieldState::new(&field.name)
                .with_required(field.required)
                .with_enabled(field.enabled);
            if let Some(value) = &field.value {
                state = state.with_value(value);
            }

            let state = Rc::new(RefCell::new(state));
            let handle: FieldHandle = state.clone();
            builder = builder.subscribe_field(&field.name, handle);
            fields.insert(field.name.clone(), state);
        }

        Self {
            form: builder.build(),
            fields,
            listeners: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    /// Register a handler for `event`. Names outside the built-in set become
    /// valid events once a handler exists.
    pub fn add_listener(
        &mut self,
        event: impl Into<String>,
        listener: impl Fn(&mut FormComponent<A>, &[String]) -> Result<(), FormError> + 'static,
    ) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(listener));
    }

    #[must_use]
    pub const fn form(&self) -> &FormComponent<A> {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut FormComponent<A> {
        &mut self.form
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Rc<RefCell<FieldState>>> {
        self.fields.get(name)
    }

    /// Apply request state, run the event, render.
    ///
    /// Contention during the event is reported as a failure message and the
    /// form and fields render as they were before the event. Contention on
    /// the header lookup after the event renders the post-event state
    /// without a retry message.
    pub fn handle(&mut self, request: &ViewRequest) -> Result<ViewResponse, InternalError> {
        self.initialize_state(&request.state)?;

        match self.dispatch(&request.event, &request.args) {
            Ok(()) => {}
            Err(err) if err.is_retryable() => {
                warn!(event = %request.event, error = %err, "request hit contention");
                self.add_concurrent_modify_message();
                return Ok(self.response(self.form.render_detached()));
            }
            Err(err) => return Err(err.into()),
        }

        let form = match self.form.render() {
            Ok(form) => form,
            Err(err) if err.is_retryable() => {
                warn!(event = %request.event, error = %err, "header lookup hit contention");
                self.form.render_detached()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(self.response(form))
    }

    fn initialize_state(&mut self, state: &ViewState) -> Result<(), FormError> {
        self.form.initialize_state(&state.form)?;

        for (name, frame) in &state.fields {
            match self.fields.get(name) {
                Some(field) => field.borrow_mut().initialize(frame)?,
                None => debug!(field = %name, "state for unknown field ignored"),
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, name: &str, args: &[String]) -> Result<(), FormError> {
        let custom = self.listeners.get(name);

        match name.parse::<FormEvent>() {
            Ok(event) => self.form.run(event, args)?,
            Err(err) if custom.is_none() => return Err(err),
            Err(_) => debug!(event = name, "custom event"),
        }

        if let Some(listeners) = self.listeners.get(name) {
            for listener in listeners {
                listener(&mut self.form, args)?;
            }
        }

        Ok(())
    }

    fn add_concurrent_modify_message(&mut self) {
        let text = self
            .form
            .translate(&[format!("{CORE_MESSAGE_PREFIX}.concurrentModify")]);
        self.messages.push(Message::failure(text));
    }

    fn response(&self, form: JsonValue) -> ViewResponse {
        let fields = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.borrow().render()))
            .collect();

        ViewResponse {
            form,
            fields,
            messages: self.messages.clone(),
        }
    }
}
