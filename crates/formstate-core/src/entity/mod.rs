#[cfg(test)]
mod tests;

use crate::{model::EntityModel, value::Value};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// EntityId
/// Identifier of a persisted record.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// ErrorMessage
///
/// Validation message attached to an entity, either to one field or globally.
/// `message` is a translation key; `vars` are its positional arguments.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(default)]
    pub vars: Vec<String>,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            vars: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.vars.push(var.into());
        self
    }
}

///
/// Entity
///
/// One business record as exchanged with an entity accessor: identity,
/// field values and the validation annotations produced by a save.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    namespace: String,
    name: String,
    id: Option<EntityId>,
    fields: BTreeMap<String, Value>,
    field_errors: BTreeMap<String, ErrorMessage>,
    global_errors: Vec<ErrorMessage>,
    not_valid: bool,
}

impl Entity {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        id: Option<EntityId>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            id,
            fields: BTreeMap::new(),
            field_errors: BTreeMap::new(),
            global_errors: Vec::new(),
            not_valid: false,
        }
    }

    /// Create an empty record for a model.
    #[must_use]
    pub fn for_model(model: &EntityModel, id: Option<EntityId>) -> Self {
        Self::new(&model.namespace, &model.entity_name, id)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub const fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    /// Field value; absent fields read as `Null`.
    #[must_use]
    pub fn field(&self, name: &str) -> &Value {
        const NULL: &Value = &Value::Null;

        self.fields.get(name).unwrap_or(NULL)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<&ErrorMessage> {
        self.field_errors.get(field)
    }

    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, ErrorMessage> {
        &self.field_errors
    }

    /// Attach a message to one field; the first message per field wins.
    pub fn add_error(&mut self, field: impl Into<String>, message: ErrorMessage) {
        self.field_errors.entry(field.into()).or_insert(message);
    }

    #[must_use]
    pub fn global_errors(&self) -> &[ErrorMessage] {
        &self.global_errors
    }

    pub fn add_global_error(&mut self, message: ErrorMessage) {
        self.global_errors.push(message);
    }

    /// Mark the record invalid without attaching a message.
    pub const fn set_not_valid(&mut self) {
        self.not_valid = true;
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.not_valid && self.field_errors.is_empty() && self.global_errors.is_empty()
    }

    /// Drop every validation annotation, keeping identity and values.
    pub fn clear_errors(&mut self) {
        self.field_errors.clear();
        self.global_errors.clear();
        self.not_valid = false;
    }
}
