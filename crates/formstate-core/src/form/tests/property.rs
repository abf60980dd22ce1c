use super::{widget, widget_store};
use crate::{entity::EntityId, form::FormEvent};
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,12}"
}

fn arb_event() -> impl Strategy<Value = FormEvent> {
    prop_oneof![
        Just(FormEvent::Clear),
        Just(FormEvent::Save),
        Just(FormEvent::SaveAndClear),
        Just(FormEvent::Initialize),
        Just(FormEvent::Delete),
    ]
}

proptest! {
    #[test]
    fn save_round_trips_field_values(
        name in arb_text(),
        color in arb_text(),
        first_id in 1u64..1_000,
    ) {
        let mut h = widget(widget_store().with_next_id(first_id));
        h.set("name", &name);
        h.set("color", &color);

        h.form.save(&[]).unwrap();
        h.form.initialize(&[]).unwrap();

        prop_assert_eq!(h.form.entity_id(), Some(EntityId::new(first_id)));
        prop_assert!(h.form.is_valid());
        prop_assert_eq!(h.value("name"), Some(name));
        prop_assert_eq!(h.value("color"), Some(color));
    }

    #[test]
    fn clear_is_idempotent(events in prop::collection::vec(arb_event(), 0..6), name in arb_text()) {
        let mut h = widget(widget_store());
        h.set("name", &name);
        h.set("color", &name);
        for event in events {
            h.form.run(event, &[]).unwrap();
        }

        h.form.clear(&[]).unwrap();
        let once = h.form.render().unwrap();
        h.form.clear(&[]).unwrap();
        let twice = h.form.render().unwrap();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(h.form.entity_id(), None);
        prop_assert!(h.form.is_valid());
    }

    #[test]
    fn required_on_create_iff_unbound(
        events in prop::collection::vec(arb_event(), 0..8),
        name in arb_text(),
    ) {
        let mut h = widget(widget_store());

        for event in events {
            h.set("name", &name);
            h.set("color", &name);
            h.form.run(event, &[]).unwrap();

            prop_assert!(h.field("name").is_required());
            prop_assert_eq!(h.field("color").is_required(), h.form.entity_id().is_none());
        }
    }
}
