use crate::{
    component::MessageKind,
    config::{FieldConfig, ViewConfig},
    entity::{Entity, EntityId},
    error::{ErrorClass, ErrorOrigin},
    form::FormError,
    store::MemoryAccessor,
    test_support::{document_model, widget_model},
    translate::CatalogTranslator,
    view::{FormView, ViewRequest},
};
use serde_json::{from_value, json};
use std::rc::Rc;

fn widget_view(store: &Rc<MemoryAccessor>) -> FormView<Rc<MemoryAccessor>> {
    FormView::from_config(&ViewConfig::for_model(widget_model()), store.clone())
}

fn request(value: serde_json::Value) -> ViewRequest {
    from_value(value).unwrap()
}

#[test]
fn save_request_applies_state_and_renders_everything() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);

    let response = view
        .handle(&request(json!({
            "event": "save",
            "state": {
                "fields": {
                    "name": { "content": { "value": "Bolt" } },
                    "color": { "content": { "value": "red" } },
                },
            },
        })))
        .unwrap();

    assert_eq!(response.form["content"]["entityId"], json!(1));
    assert_eq!(response.form["content"]["valid"], json!(true));
    assert_eq!(response.fields["name"]["content"]["value"], json!("Bolt"));
    assert_eq!(response.fields["color"]["content"]["required"], json!(false));
    assert!(response.messages.is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn form_frame_binds_the_identifier() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let id = store.insert(
        Entity::for_model(&widget_model(), None)
            .with_field("name", "Bolt")
            .with_field("color", "red"),
    );
    let mut view = widget_view(&store);

    let response = view
        .handle(&request(json!({
            "event": "initialize",
            "state": { "form": { "content": { "entityId": id.get() } } },
        })))
        .unwrap();

    assert_eq!(view.form().entity_id(), Some(id));
    assert_eq!(response.fields["color"]["content"]["value"], json!("red"));
    assert_eq!(
        response.form["content"]["header"],
        json!("basic.widget.form.headerEdit")
    );
}

#[test]
fn custom_listeners_run_after_the_built_in_event() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);
    view.add_listener("clear", |form, _| {
        form.add_message("cleared", MessageKind::Info);
        Ok(())
    });

    let response = view.handle(&ViewRequest::event("clear")).unwrap();

    assert_eq!(response.form["messages"][0]["text"], json!("cleared"));
}

#[test]
fn custom_event_names_need_a_listener() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);

    let err = view.handle(&ViewRequest::event("approve")).unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert_eq!(err.origin, ErrorOrigin::Form);

    view.add_listener("approve", |form, args| {
        form.add_message(format!("approved {}", args.join(",")), MessageKind::Success);
        Ok(())
    });
    let mut approve = ViewRequest::event("approve");
    approve.args = vec!["a".to_string(), "b".to_string()];

    let response = view.handle(&approve).unwrap();
    assert_eq!(response.form["messages"][0]["text"], json!("approved a,b"));
}

#[test]
fn listener_errors_propagate() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);
    view.add_listener("save", |_, _| Err(FormError::UnknownEvent("nested".to_string())));

    assert!(view.handle(&ViewRequest::event("save")).is_err());
}

#[test]
fn contention_becomes_a_failure_message() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let id = store.insert(
        Entity::for_model(&widget_model(), None)
            .with_field("name", "Bolt")
            .with_field("color", "red"),
    );
    let translator = CatalogTranslator::new().with_entry(
        "en",
        "core.message.concurrentModify",
        "record is being edited elsewhere",
    );
    let mut view = FormView::from_config_with(
        &ViewConfig::for_model(widget_model()),
        store.clone(),
        translator,
    );
    store.set_contended(true);

    let response = view
        .handle(&request(json!({
            "event": "save",
            "state": {
                "form": { "content": { "entityId": id.get() } },
                "fields": { "name": { "content": { "value": "Nut" } } },
            },
        })))
        .unwrap();

    assert_eq!(response.messages.len(), 1);
    assert_eq!(response.messages[0].kind, MessageKind::Failure);
    assert_eq!(response.messages[0].text, "record is being edited elsewhere");
    assert_eq!(response.form["content"]["entityId"], json!(id.get()));
    assert_eq!(response.form["content"]["headerEntityIdentifier"], json!(""));
    assert_eq!(response.fields["name"]["content"]["value"], json!("Nut"));
    assert_eq!(response.fields["name"]["messages"], json!([]));

    store.set_contended(false);
    let stored = crate::accessor::EntityAccessor::get(&store, id).unwrap().unwrap();
    assert_eq!(stored.field("name"), &crate::value::Value::from("Bolt"));
}

#[test]
fn malformed_state_is_a_wire_error() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);

    let err = view
        .handle(&request(json!({
            "event": "save",
            "state": { "form": { "content": { "entityId": "x" } } },
        })))
        .unwrap_err();

    assert_eq!(err.origin, ErrorOrigin::Wire);
    assert_eq!(store.calls().save, 0);
}

#[test]
fn declared_field_flags_survive_rule_passes() {
    let mut config = ViewConfig::for_model(document_model());
    config.fields = vec![
        FieldConfig {
            required: true,
            ..FieldConfig::new("name")
        },
        FieldConfig {
            enabled: false,
            value: Some("PZ/1".to_string()),
            ..FieldConfig::new("number")
        },
        FieldConfig::new("note"),
    ];
    let store = Rc::new(MemoryAccessor::new(document_model()));
    let mut view = FormView::from_config(&config, store);

    let response = view.handle(&ViewRequest::event("reset")).unwrap();

    assert_eq!(response.fields["name"]["content"]["required"], json!(true));
    assert_eq!(response.fields["number"]["enabled"], json!(false));
    // unbound components render untouched
    assert!(response.fields.contains_key("note"));
    assert_eq!(view.form().fields().len(), 2);
    assert_eq!(view.form().entity_id(), None::<EntityId>);
}

#[test]
fn contention_after_a_committed_save_is_not_reported_as_a_retry() {
    let store = Rc::new(MemoryAccessor::new(widget_model()));
    let mut view = widget_view(&store);
    view.add_listener("save", |form, _| {
        form.accessor().set_contended(true);
        Ok(())
    });

    let response = view
        .handle(&request(json!({
            "event": "save",
            "state": {
                "fields": {
                    "name": { "content": { "value": "Bolt" } },
                    "color": { "content": { "value": "red" } },
                },
            },
        })))
        .unwrap();

    assert!(response.messages.is_empty());
    assert_eq!(response.form["content"]["entityId"], json!(1));
    assert_eq!(response.form["content"]["headerEntityIdentifier"], json!(""));
    assert_eq!(response.form["messages"][0]["kind"], json!("success"));
    assert_eq!(response.fields["color"]["content"]["required"], json!(false));

    store.set_contended(false);
    assert_eq!(store.len(), 1);
}
