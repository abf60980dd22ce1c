use crate::{
    accessor::EntityAccessor,
    entity::EntityId,
    expression,
    form::{FormComponent, FormError},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use thiserror::Error as ThisError;

///
/// WireError
/// Malformed inbound component state.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum WireError {
    #[error("'{key}' is not a valid entity identifier")]
    InvalidEntityId { key: String },

    #[error("field '{field}' carries a non-scalar value")]
    InvalidFieldValue { field: String },

    #[error("'{key}' must be a JSON object")]
    NotAnObject { key: String },
}

///
/// FormContent
/// Outbound content of the form component.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContent {
    pub entity_id: Option<EntityId>,
    pub valid: bool,
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_entity_identifier: Option<String>,
}

impl<A: EntityAccessor> FormComponent<A> {
    /// Adopt `{ "content": {...}, "context": {...} }`; both halves are optional.
    pub fn initialize_state(&mut self, frame: &JsonValue) -> Result<(), FormError> {
        if !frame.is_null() && !frame.is_object() {
            return Err(WireError::NotAnObject {
                key: "state".to_string(),
            }
            .into());
        }
        if let Some(content) = frame.get("content") {
            self.initialize_content(content)?;
        }
        if let Some(context) = frame.get("context") {
            self.initialize_context(context)?;
        }

        Ok(())
    }

    pub fn initialize_content(&mut self, content: &JsonValue) -> Result<(), WireError> {
        let content = as_object(content, "content")?;
        if let Some(id) = parse_entity_id(content.get("entityId"), "entityId")? {
            self.entity_id = Some(id);
        }

        Ok(())
    }

    /// `id` is an alternate spelling of the identifier; every other key is
    /// kept verbatim.
    pub fn initialize_context(&mut self, context: &JsonValue) -> Result<(), WireError> {
        let context = as_object(context, "context")?;

        for (key, value) in context {
            if key == "id" {
                if let Some(id) = parse_entity_id(Some(value), key)? {
                    self.entity_id = Some(id);
                }
            } else {
                self.context.insert(key.clone(), value.clone());
            }
        }

        Ok(())
    }

    /// Render the content half. Never mutates the form; the identifier
    /// expression runs against a fresh lookup.
    pub fn render_content(&self) -> Result<FormContent, FormError> {
        let identifier = match self.entity_id {
            Some(id) => Some(
                self.accessor
                    .get(id)?
                    .map(|entity| {
                        expression::evaluate(&self.expression, &entity, self.accessor.model())
                    })
                    .unwrap_or_default(),
            ),
            None => None,
        };

        Ok(self.content(identifier))
    }

    /// Render without touching the accessor; a bound identifier renders an
    /// empty header identifier.
    #[must_use]
    pub fn render_detached(&self) -> JsonValue {
        let identifier = self.entity_id.map(|_| String::new());

        self.envelope(&self.content(identifier))
    }

    fn content(&self, header_entity_identifier: Option<String>) -> FormContent {
        let header = if self.entity_id.is_some() {
            self.translate_header("headerEdit")
        } else {
            self.translate_header("headerNew")
        };

        FormContent {
            entity_id: self.entity_id,
            valid: self.valid,
            header,
            header_entity_identifier,
        }
    }

    /// Component envelope: content, form messages and the re-render flag.
    pub fn render(&self) -> Result<JsonValue, FormError> {
        let content = self.render_content()?;

        Ok(self.envelope(&content))
    }

    fn envelope(&self, content: &FormContent) -> JsonValue {
        json!({
            "content": content,
            "messages": self.messages,
            "renderRequested": self.render_requested,
        })
    }

    fn translate_header(&self, key: &str) -> String {
        self.translate(&[format!("{}.{key}", self.translation_path)])
    }
}

fn as_object<'a>(value: &'a JsonValue, key: &str) -> Result<&'a Map<String, JsonValue>, WireError> {
    value.as_object().ok_or_else(|| WireError::NotAnObject {
        key: key.to_string(),
    })
}

// Accepts a non-negative integer or its decimal string; null means unset.
fn parse_entity_id(value: Option<&JsonValue>, key: &str) -> Result<Option<EntityId>, WireError> {
    let invalid = || WireError::InvalidEntityId {
        key: key.to_string(),
    };

    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n.as_u64().map(EntityId::new).map(Some).ok_or_else(invalid),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(|id| Some(EntityId::new(id)))
            .map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
