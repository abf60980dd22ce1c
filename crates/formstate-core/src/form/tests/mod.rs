mod property;

use crate::{
    component::{FieldComponent, FieldState},
    form::FormComponent,
    store::MemoryAccessor,
    test_support::{document_model, field, widget_model},
};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

///
/// Harness
/// A built form, its store, and direct handles on every subscribed field.
///

struct Harness {
    form: FormComponent<Rc<MemoryAccessor>>,
    store: Rc<MemoryAccessor>,
    fields: BTreeMap<String, Rc<RefCell<FieldState>>>,
}

impl Harness {
    fn new(store: MemoryAccessor, names: &[&str]) -> Self {
        let store = Rc::new(store);
        let mut builder = FormComponent::builder(store.clone()).expression("#{number}");
        let mut fields = BTreeMap::new();

        for name in names {
            let (state, handle) = field(name);
            builder = builder.subscribe_field(*name, handle);
            fields.insert((*name).to_string(), state);
        }

        Self {
            form: builder.build(),
            store,
            fields,
        }
    }

    fn field(&self, name: &str) -> std::cell::Ref<'_, FieldState> {
        self.fields[name].borrow()
    }

    fn value(&self, name: &str) -> Option<String> {
        self.field(name).value().map(str::to_string)
    }

    fn set(&self, name: &str, value: &str) {
        self.fields[name]
            .borrow_mut()
            .set_field_value(Some(value.to_string()));
    }

    fn field_messages(&self, name: &str) -> usize {
        self.field(name).messages().len()
    }
}

fn widget(store: MemoryAccessor) -> Harness {
    Harness::new(store, &["name", "color", "parts"])
}

fn widget_store() -> MemoryAccessor {
    MemoryAccessor::new(widget_model())
}

fn document(store: MemoryAccessor) -> Harness {
    Harness::new(
        store,
        &["name", "number", "status", "quantity", "createdBy", "positions"],
    )
}

fn document_store() -> MemoryAccessor {
    MemoryAccessor::new(document_model())
}
