use crate::model::field::FieldModel;
use serde::{Deserialize, Serialize};

///
/// EntityModel
/// Runtime model for one entity: its namespace, name and ordered fields.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntityModel {
    /// Plugin-style namespace the entity belongs to.
    pub namespace: String,
    /// Stable external name used in routing and diagnostics.
    pub entity_name: String,
    /// Ordered field list (authoritative for binding and validation).
    #[serde(default)]
    pub fields: Vec<FieldModel>,
}

impl EntityModel {
    pub fn new(namespace: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entity_name: entity_name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// `namespace.entity_name`, used as the metrics and log key.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}.{}", self.namespace, self.entity_name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
