use crate::{
    component::{FieldHandle, ListenerRegistry},
    model::{EntityModel, FieldModel},
};
use std::collections::BTreeMap;
use tracing::debug;

///
/// FieldBinding
/// One field component paired with the metadata of the field it edits.
///

pub struct FieldBinding {
    model: FieldModel,
    component: FieldHandle,
}

impl FieldBinding {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.model.name
    }

    #[must_use]
    pub const fn model(&self) -> &FieldModel {
        &self.model
    }

    #[must_use]
    pub const fn component(&self) -> &FieldHandle {
        &self.component
    }
}

///
/// FieldRegistry
///
/// Field components the form synchronizes with its entity. Built once from
/// the identifier-change subscribers during the bind phase and immutable
/// afterwards.
///

#[derive(Default)]
pub struct FieldRegistry {
    bindings: BTreeMap<String, FieldBinding>,
}

impl FieldRegistry {
    /// Keep field-capable subscribers that name a scalar model field.
    #[must_use]
    pub(crate) fn bind(listeners: &ListenerRegistry, model: &EntityModel) -> Self {
        let mut bindings = BTreeMap::new();

        for subscriber in listeners.subscribers() {
            let Some(component) = subscriber.as_field() else {
                continue;
            };

            match model.field(subscriber.name()) {
                Some(field) if !field.kind.is_to_many() => {
                    bindings.insert(
                        field.name.clone(),
                        FieldBinding {
                            model: field.clone(),
                            component: component.clone(),
                        },
                    );
                }
                _ => debug!(
                    entity = %model.path(),
                    field = subscriber.name(),
                    "subscriber not bound to a scalar field"
                ),
            }
        }

        Self { bindings }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldBinding> {
        self.bindings.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
