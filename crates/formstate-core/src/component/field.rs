use crate::{
    component::{EntityIdChangeListener, Message, MessageKind},
    entity::EntityId,
    error::InternalError,
    form::WireError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

///
/// FieldComponent
///
/// Contract the form drives on every bound field. Values travel as display
/// text; conversion to typed values belongs to the accessor.
///

pub trait FieldComponent: EntityIdChangeListener {
    fn field_value(&self) -> Option<String>;

    fn set_field_value(&mut self, value: Option<String>);

    /// Apply the rule-derived required flag for this pass.
    fn set_required(&mut self, required: bool);

    /// Apply the rule-derived enabled flag for this pass.
    fn set_enabled(&mut self, enabled: bool);

    fn add_message(&mut self, text: &str, kind: MessageKind);

    /// Capture the state a failed transition rolls back to.
    fn snapshot(&self) -> FieldSnapshot;

    fn restore(&mut self, snapshot: FieldSnapshot);
}

///
/// FieldSnapshot
/// Mutable state of a field component; messages are kept by count since a
/// transition only appends.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldSnapshot {
    pub value: Option<String>,
    pub required: bool,
    pub enabled: bool,
    pub messages: usize,
    pub scope_entity_id: Option<EntityId>,
}

///
/// FieldContent
/// Wire shape of a field's mutable content.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldContent {
    pub value: Option<String>,
    pub required: bool,
}

///
/// FieldState
///
/// Plain text input component. The view definition declares the base
/// required/enabled flags; rule passes only tighten them.
///

#[derive(Clone, Debug)]
pub struct FieldState {
    name: String,
    value: Option<String>,
    declared_required: bool,
    declared_enabled: bool,
    required: bool,
    enabled: bool,
    messages: Vec<Message>,
    scope_entity_id: Option<EntityId>,
}

impl FieldState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            declared_required: false,
            declared_enabled: true,
            required: false,
            enabled: true,
            messages: Vec::new(),
            scope_entity_id: None,
        }
    }

    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.declared_required = required;
        self.required = required;
        self
    }

    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.declared_enabled = enabled;
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Identifier of the record the owning form last announced.
    #[must_use]
    pub const fn scope_entity_id(&self) -> Option<EntityId> {
        self.scope_entity_id
    }

    /// Adopt mutable content from an inbound component frame.
    ///
    /// Accepts `{ "content": { "value": ... } }`; numbers and booleans are
    /// taken as their text.
    pub fn initialize(&mut self, frame: &JsonValue) -> Result<(), WireError> {
        let Some(content) = frame.get("content") else {
            return Ok(());
        };
        let value = match content.get("value") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(v @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Some(v.to_string()),
            Some(_) => {
                return Err(WireError::InvalidFieldValue {
                    field: self.name.clone(),
                });
            }
        };
        self.value = value;

        Ok(())
    }

    #[must_use]
    pub fn render(&self) -> JsonValue {
        let content = FieldContent {
            value: self.value.clone(),
            required: self.required,
        };

        json!({
            "content": content,
            "enabled": self.enabled,
            "messages": self.messages,
        })
    }
}

impl EntityIdChangeListener for FieldState {
    fn on_entity_id_change(&mut self, id: Option<EntityId>) -> Result<(), InternalError> {
        self.scope_entity_id = id;

        Ok(())
    }
}

impl FieldComponent for FieldState {
    fn field_value(&self) -> Option<String> {
        self.value.clone()
    }

    fn set_field_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    fn set_required(&mut self, required: bool) {
        self.required = self.declared_required || required;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = self.declared_enabled && enabled;
    }

    fn add_message(&mut self, text: &str, kind: MessageKind) {
        self.messages.push(Message::new(text, kind));
    }

    fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            value: self.value.clone(),
            required: self.required,
            enabled: self.enabled,
            messages: self.messages.len(),
            scope_entity_id: self.scope_entity_id,
        }
    }

    fn restore(&mut self, snapshot: FieldSnapshot) {
        self.value = snapshot.value;
        self.required = snapshot.required;
        self.enabled = snapshot.enabled;
        self.messages.truncate(snapshot.messages);
        self.scope_entity_id = snapshot.scope_entity_id;
    }
}
