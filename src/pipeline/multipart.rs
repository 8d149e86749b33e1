use serde_json::{Map, Value};

use super::stage::MultipartField;

/// One uploaded binary part, already decoded by the hosting upload stage.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedPart {
    pub field: String,
    pub value: Value,
}

/// Normalize a multipart body in place.
///
/// This is the runtime semantics the `MultipartNormalize` stage stands for;
/// every renderer must reproduce it. For each listed field: absent fields
/// are initialized to an empty list and present non-list values are wrapped
/// in a single-element list. Uploaded parts are then merged under their
/// field name, appending when the field is already a list and setting it
/// otherwise. Finally, optional listed fields that ended up as an empty
/// list are removed; absence must not surface as `[]` to callers that
/// treat the field as fully optional.
pub fn normalize_multipart(
    body: &mut Map<String, Value>,
    fields: &[MultipartField],
    uploads: Vec<UploadedPart>,
) {
    for field in fields {
        match body.get_mut(&field.name) {
            None => {
                body.insert(field.name.clone(), Value::Array(Vec::new()));
            }
            Some(value) if !value.is_array() => {
                let single = value.take();
                *value = Value::Array(vec![single]);
            }
            Some(_) => {}
        }
    }

    for part in uploads {
        match body.get_mut(&part.field) {
            Some(Value::Array(items)) => items.push(part.value),
            _ => {
                body.insert(part.field, part.value);
            }
        }
    }

    for field in fields {
        if !field.optional {
            continue;
        }
        if matches!(body.get(&field.name), Some(Value::Array(items)) if items.is_empty()) {
            body.remove(&field.name);
        }
    }
}
