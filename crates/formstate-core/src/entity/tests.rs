use crate::{
    entity::{Entity, EntityId, ErrorMessage},
    value::Value,
};

#[test]
fn missing_fields_read_as_null() {
    let entity = Entity::new("basic", "widget", None);

    assert_eq!(entity.field("name"), &Value::Null);
    assert!(!entity.has_field("name"));
}

#[test]
fn validity_tracks_field_and_global_errors() {
    let mut entity = Entity::new("basic", "widget", Some(EntityId::new(1)));
    assert!(entity.is_valid());

    entity.add_error("name", ErrorMessage::new("core.validate.field.error.missing"));
    assert!(!entity.is_valid());

    entity.clear_errors();
    entity.add_global_error(ErrorMessage::new("basic.widget.error.locked"));
    assert!(!entity.is_valid());

    entity.clear_errors();
    entity.set_not_valid();
    assert!(!entity.is_valid());
}

#[test]
fn first_error_per_field_is_kept() {
    let mut entity = Entity::new("basic", "widget", None);
    entity.add_error("name", ErrorMessage::new("first"));
    entity.add_error("name", ErrorMessage::new("second"));

    assert_eq!(entity.error("name").map(|e| e.message.as_str()), Some("first"));
}

#[test]
fn entity_id_displays_as_number() {
    assert_eq!(EntityId::new(42).to_string(), "42");
    assert_eq!(EntityId::from(7).get(), 7);
}

#[test]
fn error_message_vars_are_positional() {
    let message = ErrorMessage::new("stock.lack").with_var("R-1").with_var("P-9");

    assert_eq!(message.vars, vec!["R-1".to_string(), "P-9".to_string()]);
}
