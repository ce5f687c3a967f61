// Where the store API's field layout differs from the form's.

use serde_json::{Map, Value};

use super::Resource;
use crate::forms::{FieldValue, FormDraft};

/// Named values in the order they are sent.
pub type WireFields = Vec<(String, FieldValue)>;

pub(super) fn wire_fields(resource: Resource, draft: &FormDraft) -> WireFields {
    match resource {
        Resource::Product => product_fields(draft),
        _ => draft
            .values()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    }
}

/// Products take their category as a one-element list and carry the unit
/// inside the weight ("500 g").
fn product_fields(draft: &FormDraft) -> WireFields {
    let unit = draft.text("unit").unwrap_or_default().trim();

    draft
        .values()
        .filter(|(name, _)| *name != "unit")
        .map(|(name, value)| match (name, value) {
            ("category", value) => ("category[0]".to_string(), value.clone()),
            ("weight", FieldValue::Text(weight)) => {
                let weight = weight.trim();
                let joined = if unit.is_empty() || weight.is_empty() {
                    weight.to_string()
                } else {
                    format!("{} {}", weight, unit)
                };
                ("weight".to_string(), FieldValue::Text(joined))
            }
            (name, value) => (name.to_string(), value.clone()),
        })
        .collect()
}

pub(super) fn edit_record(resource: Resource, record: Value) -> Value {
    match (resource, record) {
        (Resource::Product, Value::Object(mut map)) => {
            product_record(&mut map);
            Value::Object(map)
        }
        (_, record) => record,
    }
}

/// Undo the product wire layout so a listed row fits the form again.
fn product_record(map: &mut Map<String, Value>) {
    let category = map
        .get("categories")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("id"))
        .cloned();
    if let Some(id) = category {
        map.insert("category".to_string(), id);
    }

    let split = map
        .get("weight")
        .and_then(Value::as_str)
        .and_then(|w| w.trim().split_once(' '))
        .map(|(weight, unit)| (weight.trim().to_string(), unit.trim().to_string()));
    if let Some((weight, unit)) = split {
        let has_unit = map
            .get("unit")
            .and_then(Value::as_str)
            .is_some_and(|u| !u.is_empty());
        if !has_unit {
            map.insert("unit".to_string(), Value::String(unit));
        }
        map.insert("weight".to_string(), Value::String(weight));
    }
}
