use crate::{
    component::{FieldHandle, FieldState},
    model::{EntityModel, FieldKind, FieldModel, FieldRules},
};
use std::{cell::RefCell, rc::Rc};

///
/// Fixtures
///
/// Shared models for unit tests. `widget` mirrors the create/update rule
/// scenario; `document` adds defaults, enums and read-only fields.
///

pub(crate) fn widget_model() -> EntityModel {
    EntityModel::new("basic", "widget")
        .with_field(FieldModel::new("name", FieldKind::Text).with_rules(FieldRules::required()))
        .with_field(
            FieldModel::new("color", FieldKind::Text).with_rules(FieldRules::required_on_create()),
        )
        .with_field(
            FieldModel::new(
                "parts",
                FieldKind::HasMany {
                    entity: "part".to_string(),
                },
            ),
        )
}

pub(crate) fn document_model() -> EntityModel {
    EntityModel::new("materialFlowResources", "document")
        .with_field(FieldModel::new("name", FieldKind::Text))
        .with_field(
            FieldModel::new("number", FieldKind::Text)
                .with_rules(FieldRules::read_only_on_update()),
        )
        .with_field(
            FieldModel::new(
                "status",
                FieldKind::Enum {
                    values: vec![
                        "DRAFT".to_string(),
                        "ACCEPTED".to_string(),
                        "APPROVED".to_string(),
                    ],
                },
            )
            .with_default("DRAFT"),
        )
        .with_field(FieldModel::new("quantity", FieldKind::Integer).with_default(1))
        .with_field(
            FieldModel::new("createdBy", FieldKind::Text).with_rules(FieldRules::read_only()),
        )
        .with_field(FieldModel::new(
            "positions",
            FieldKind::HasMany {
                entity: "position".to_string(),
            },
        ))
}

/// Fresh field state plus its type-erased handle.
pub(crate) fn field(name: &str) -> (Rc<RefCell<FieldState>>, FieldHandle) {
    let state = Rc::new(RefCell::new(FieldState::new(name)));
    let handle: FieldHandle = state.clone();

    (state, handle)
}
