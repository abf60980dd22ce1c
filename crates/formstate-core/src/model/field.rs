use crate::{entity::EntityId, value::Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

///
/// FieldModel
/// Runtime field metadata used by binding, conversion and validation.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldModel {
    pub name: String,
    pub kind: FieldKind,
    /// Declared default, applied to field components before entity values.
    #[serde(default, rename = "default")]
    pub default_value: Option<JsonValue>,
    #[serde(default)]
    pub rules: FieldRules,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: None,
            rules: FieldRules::default(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<JsonValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.default_value
            .as_ref()
            .map(Value::from_json)
            .filter(|value| !value.is_null())
    }

    /// Render a value the way a field component displays it.
    #[must_use]
    pub fn to_text(&self, value: &Value) -> String {
        self.kind.to_text(value)
    }

    /// Coerce an inbound value (typically field text) into this field's kind.
    pub fn coerce(&self, value: &Value) -> Result<Value, ConvertError> {
        self.kind.coerce(value)
    }
}

///
/// FieldRules
///
/// Create/update-conditional constraints applied to field components.
/// Every flag defaults to off.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldRules {
    pub required: bool,
    pub required_on_create: bool,
    pub read_only: bool,
    pub read_only_on_update: bool,
}

impl FieldRules {
    #[must_use]
    pub const fn required() -> Self {
        Self {
            required: true,
            required_on_create: false,
            read_only: false,
            read_only_on_update: false,
        }
    }

    #[must_use]
    pub const fn required_on_create() -> Self {
        Self {
            required: false,
            required_on_create: true,
            read_only: false,
            read_only_on_update: false,
        }
    }

    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            required: false,
            required_on_create: false,
            read_only: true,
            read_only_on_update: false,
        }
    }

    #[must_use]
    pub const fn read_only_on_update() -> Self {
        Self {
            required: false,
            required_on_create: false,
            read_only: false,
            read_only_on_update: true,
        }
    }

    /// Whether a field component must be marked required for this bound state.
    #[must_use]
    pub const fn is_required(&self, bound: bool) -> bool {
        self.required || (!bound && self.required_on_create)
    }

    /// Whether a field component must be disabled for this bound state.
    #[must_use]
    pub const fn is_locked(&self, bound: bool) -> bool {
        self.read_only || (bound && self.read_only_on_update)
    }
}

///
/// FieldKind
///
/// Type surface of a field as far as text conversion is concerned.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Enum { values: Vec<String> },
    BelongsTo { entity: String },
    HasMany { entity: String },
}

impl FieldKind {
    /// To-many relations never bind to a scalar field component.
    #[must_use]
    pub const fn is_to_many(&self) -> bool {
        matches!(self, Self::HasMany { .. })
    }

    #[must_use]
    pub fn to_text(&self, value: &Value) -> String {
        match (self, value) {
            (_, Value::Null) => String::new(),
            (Self::Boolean, Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
            (_, Value::Bool(b)) => b.to_string(),
            (_, Value::Int(i)) => i.to_string(),
            (_, Value::Float(f)) => f.to_string(),
            (_, Value::Text(s)) => s.clone(),
            (_, Value::Ref(id)) => id.to_string(),
            (_, Value::Json(json)) => json.to_string(),
        }
    }

    pub fn coerce(&self, value: &Value) -> Result<Value, ConvertError> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::Text(text) if text.trim().is_empty() => return Ok(Value::Null),
            Value::Text(text) => text.trim(),
            other => return self.coerce_typed(other),
        };

        match self {
            Self::Text => Ok(Value::Text(text.to_string())),
            Self::Integer => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ConvertError::InvalidNumber(text.to_string())),
            Self::Decimal => text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(|| ConvertError::InvalidNumber(text.to_string())),
            Self::Boolean => match text {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" => Ok(Value::Bool(false)),
                _ => Err(ConvertError::InvalidBoolean(text.to_string())),
            },
            Self::Enum { values } => {
                if values.iter().any(|v| v == text) {
                    Ok(Value::Text(text.to_string()))
                } else {
                    Err(ConvertError::InvalidDictionaryItem(text.to_string()))
                }
            }
            Self::BelongsTo { .. } => text
                .parse::<u64>()
                .map(|id| Value::Ref(EntityId::new(id)))
                .map_err(|_| ConvertError::InvalidReference(text.to_string())),
            Self::HasMany { .. } => Err(ConvertError::NotScalar),
        }
    }

    // Already-typed values (context entries) pass through when the shapes agree.
    #[allow(clippy::cast_precision_loss)]
    fn coerce_typed(&self, value: &Value) -> Result<Value, ConvertError> {
        match (self, value) {
            (Self::Integer, Value::Int(_))
            | (Self::Decimal, Value::Float(_))
            | (Self::Boolean, Value::Bool(_))
            | (Self::BelongsTo { .. }, Value::Ref(_)) => Ok(value.clone()),
            (Self::Decimal, Value::Int(i)) => Ok(Value::Float(*i as f64)),
            (Self::BelongsTo { .. }, Value::Int(i)) => u64::try_from(*i)
                .map(|id| Value::Ref(EntityId::new(id)))
                .map_err(|_| ConvertError::InvalidReference(i.to_string())),
            (Self::HasMany { .. }, _) => Err(ConvertError::NotScalar),
            (_, other) => self.coerce(&Value::Text(self.to_text(other))),
        }
    }
}

///
/// ConvertError
///
/// Text conversion failures; each maps to a validation message key.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConvertError {
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("'{0}' is not a valid boolean")]
    InvalidBoolean(String),

    #[error("'{0}' is not an allowed value")]
    InvalidDictionaryItem(String),

    #[error("'{0}' is not a valid reference")]
    InvalidReference(String),

    #[error("to-many relations have no scalar value")]
    NotScalar,
}

impl ConvertError {
    /// Validation message key attached to the offending field.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidNumber(_) => "core.validate.field.error.invalidNumericFormat",
            Self::InvalidBoolean(_) => "core.validate.field.error.invalidBooleanFormat",
            Self::InvalidDictionaryItem(_) => "core.validate.field.error.invalidDictionaryItem",
            Self::InvalidReference(_) => "core.validate.field.error.invalidReference",
            Self::NotScalar => "core.validate.field.error.notScalar",
        }
    }
}
