//! Header expressions.
//!
//! A template such as `#{number} - #{name}` is rendered against an entity,
//! each placeholder replaced by the field's display text. Unknown fields
//! render empty; an unterminated `#{` is kept literally.
use crate::{entity::Entity, model::EntityModel};

/// Render `template` against `entity`.
#[must_use]
pub fn evaluate(template: &str, entity: &Entity, model: &EntityModel) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after[..end].trim();
        out.push_str(&field_text(name, entity, model));
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn field_text(name: &str, entity: &Entity, model: &EntityModel) -> String {
    if name == "id" {
        return entity.id().map(|id| id.to_string()).unwrap_or_default();
    }

    match model.field(name) {
        Some(field) => field.to_text(entity.field(name)),
        None => String::new(),
    }
}
