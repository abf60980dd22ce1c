use crate::{
    entity::EntityId,
    model::{ConvertError, EntityModel, FieldKind, FieldModel, FieldRules},
    value::Value,
};

fn status_kind() -> FieldKind {
    FieldKind::Enum {
        values: vec!["DRAFT".to_string(), "APPROVED".to_string()],
    }
}

#[test]
fn required_on_create_only_applies_while_unbound() {
    let rules = FieldRules::required_on_create();

    assert!(rules.is_required(false));
    assert!(!rules.is_required(true));
    assert!(FieldRules::required().is_required(true));
}

#[test]
fn read_only_on_update_only_applies_while_bound() {
    let rules = FieldRules::read_only_on_update();

    assert!(!rules.is_locked(false));
    assert!(rules.is_locked(true));
    assert!(FieldRules::read_only().is_locked(false));
}

#[test]
fn blank_text_coerces_to_null_for_every_kind() {
    for kind in [FieldKind::Text, FieldKind::Integer, status_kind()] {
        assert_eq!(kind.coerce(&Value::from("  ")).unwrap(), Value::Null);
    }
}

#[test]
fn integer_text_is_parsed_and_rejected_when_malformed() {
    assert_eq!(
        FieldKind::Integer.coerce(&Value::from(" 12 ")).unwrap(),
        Value::Int(12)
    );
    assert_eq!(
        FieldKind::Integer.coerce(&Value::from("1.5")),
        Err(ConvertError::InvalidNumber("1.5".to_string()))
    );
}

#[test]
fn enum_values_must_be_declared() {
    let kind = status_kind();

    assert_eq!(
        kind.coerce(&Value::from("APPROVED")).unwrap(),
        Value::from("APPROVED")
    );
    let err = kind.coerce(&Value::from("LOST")).unwrap_err();
    assert_eq!(
        err.message_key(),
        "core.validate.field.error.invalidDictionaryItem"
    );
}

#[test]
fn belongs_to_accepts_text_and_integral_ids() {
    let kind = FieldKind::BelongsTo {
        entity: "warehouse".to_string(),
    };

    assert_eq!(
        kind.coerce(&Value::from("3")).unwrap(),
        Value::Ref(EntityId::new(3))
    );
    assert_eq!(
        kind.coerce(&Value::Int(4)).unwrap(),
        Value::Ref(EntityId::new(4))
    );
    assert!(kind.coerce(&Value::Int(-1)).is_err());
}

#[test]
fn booleans_render_as_flags_and_parse_back() {
    assert_eq!(FieldKind::Boolean.to_text(&Value::Bool(true)), "1");
    assert_eq!(
        FieldKind::Boolean.coerce(&Value::from("0")).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn typed_context_values_are_reshaped_through_text() {
    assert_eq!(
        FieldKind::Text.coerce(&Value::Int(5)).unwrap(),
        Value::from("5")
    );
    assert_eq!(
        FieldKind::Decimal.coerce(&Value::Int(2)).unwrap(),
        Value::Float(2.0)
    );
}

#[test]
fn entity_model_lookup_by_name() {
    let model = EntityModel::new("basic", "widget")
        .with_field(FieldModel::new("name", FieldKind::Text))
        .with_field(FieldModel::new("color", FieldKind::Text).with_default("red"));

    assert_eq!(model.path(), "basic.widget");
    assert!(model.has_field("name"));
    assert!(!model.has_field("size"));
    assert_eq!(
        model.field("color").and_then(FieldModel::default_value),
        Some(Value::from("red"))
    );
}

#[test]
fn field_model_deserializes_from_toml() {
    let field: FieldModel = toml::from_str(
        r#"
        name = "status"
        default = "DRAFT"
        kind = { type = "enum", values = ["DRAFT", "APPROVED"] }
        rules = { requiredOnCreate = true }
        "#,
    )
    .unwrap();

    assert_eq!(field.kind, status_kind());
    assert!(field.rules.required_on_create);
    assert!(!field.rules.required);
    assert_eq!(field.default_value(), Some(Value::from("DRAFT")));
}
