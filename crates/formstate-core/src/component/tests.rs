use crate::{
    component::{
        EntityIdChangeListener, FieldComponent, FieldState, ListenerHandle, ListenerRegistry,
        Message, MessageKind,
    },
    entity::EntityId,
    error::InternalError,
    test_support::field,
};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};

#[derive(Default)]
struct Recorder {
    seen: Vec<Option<EntityId>>,
}

impl EntityIdChangeListener for Recorder {
    fn on_entity_id_change(&mut self, id: Option<EntityId>) -> Result<(), InternalError> {
        self.seen.push(id);
        Ok(())
    }
}

#[test]
fn rule_flags_only_tighten_declared_flags() {
    let mut state = FieldState::new("name").with_required(true).with_enabled(false);

    state.set_required(false);
    state.set_enabled(true);

    assert!(state.is_required());
    assert!(!state.is_enabled());
}

#[test]
fn rule_flags_are_recomputed_from_the_declared_base() {
    let mut state = FieldState::new("color");

    state.set_required(true);
    assert!(state.is_required());

    state.set_required(false);
    assert!(!state.is_required());
}

#[test]
fn field_initializes_from_frame_content() {
    let mut state = FieldState::new("quantity");

    state.initialize(&json!({ "content": { "value": 12 } })).unwrap();
    assert_eq!(state.value(), Some("12"));

    state.initialize(&json!({ "content": { "value": null } })).unwrap();
    assert_eq!(state.value(), None);

    state.initialize(&json!({})).unwrap();
    assert_eq!(state.value(), None);
}

#[test]
fn structured_field_values_are_rejected() {
    let mut state = FieldState::new("name");

    assert!(state
        .initialize(&json!({ "content": { "value": { "a": 1 } } }))
        .is_err());
}

#[test]
fn field_render_carries_content_flags_and_messages() {
    let mut state = FieldState::new("name").with_value("Bolt");
    state.add_message("missing", MessageKind::Failure);

    assert_eq!(
        state.render(),
        json!({
            "content": { "value": "Bolt", "required": false },
            "enabled": true,
            "messages": [{ "text": "missing", "kind": "failure", "autoClose": false }],
        })
    );
}

#[test]
fn success_messages_auto_close() {
    assert!(Message::success("saved").auto_close);
    assert!(!Message::info("note").auto_close);
    assert!(!Message::failure("failed").auto_close);
}

#[test]
fn registry_notifies_every_subscriber_in_order() {
    let (name, name_handle) = field("name");
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let listener: ListenerHandle = recorder.clone();

    let mut registry = ListenerRegistry::new();
    registry.subscribe_field("name", name_handle);
    registry.subscribe("grid", listener);

    registry.notify(Some(EntityId::new(3))).unwrap();
    registry.notify(None).unwrap();

    assert_eq!(name.borrow().scope_entity_id(), None);
    assert_eq!(recorder.borrow().seen, vec![Some(EntityId::new(3)), None]);
}

#[test]
fn registering_the_same_name_replaces_the_subscriber() {
    let (_, first) = field("name");
    let (_, second) = field("name");

    let mut registry = ListenerRegistry::new();
    registry.subscribe_field("name", first);
    registry.subscribe_field("name", second.clone());

    assert_eq!(registry.len(), 1);
    let bound = registry.subscribers()[0].as_field().unwrap();
    assert!(Rc::ptr_eq(bound, &second));
}

#[test]
fn borrowed_subscriber_fails_notification_instead_of_panicking() {
    let (name, handle) = field("name");
    let mut registry = ListenerRegistry::new();
    registry.subscribe_field("name", handle);

    let _guard = name.borrow_mut();

    assert!(registry.notify(None).is_err());
}

#[test]
fn field_value_round_trips_through_the_contract() {
    let (state, handle) = field("name");

    handle.borrow_mut().set_field_value(Some("Bolt".to_string()));

    assert_eq!(handle.borrow().field_value().as_deref(), Some("Bolt"));
    assert_eq!(state.borrow().value(), Some("Bolt"));
}

#[test]
fn restore_rewinds_to_the_snapshot() {
    let mut state = FieldState::new("name").with_value("Bolt");
    state.add_message("kept", MessageKind::Info);
    let snapshot = state.snapshot();

    state.set_field_value(Some("Nut".to_string()));
    state.set_required(true);
    state.set_enabled(false);
    state.add_message("dropped", MessageKind::Failure);
    state.on_entity_id_change(Some(EntityId::new(3))).unwrap();
    state.restore(snapshot);

    assert_eq!(state.value(), Some("Bolt"));
    assert!(!state.is_required());
    assert!(state.is_enabled());
    assert_eq!(state.messages().len(), 1);
    assert_eq!(state.messages()[0].text, "kept");
    assert_eq!(state.scope_entity_id(), None);
}
