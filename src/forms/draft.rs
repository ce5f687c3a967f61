//! Transient per-modal form state: field values plus field-scoped errors.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::schema::{FieldErrors, FieldKind, Schema};
use super::value::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    Client,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub source: ErrorSource,
}

/// Field values and their errors.
///
/// Changing a value always clears that field's error, whatever its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    values: BTreeMap<String, FieldValue>,
    errors: BTreeMap<String, FieldError>,
}

impl FormDraft {
    /// Empty draft for a create form, seeded with schema defaults.
    pub fn defaults(schema: &Schema) -> Self {
        let mut draft = Self::default();
        for field in schema.fields() {
            if field.kind == FieldKind::File {
                continue;
            }
            draft
                .values
                .insert(field.name.to_string(), FieldValue::text(field.default.unwrap_or("")));
        }
        draft
    }

    /// Draft for an edit form, taken from the record as the list returned it.
    ///
    /// File fields are never prefilled; an edit resubmits its uploads.
    pub fn prefilled(schema: &Schema, record: &serde_json::Value) -> Self {
        let mut draft = Self::default();
        for field in schema.fields() {
            if field.kind == FieldKind::File {
                continue;
            }
            let text = record
                .get(field.name)
                .and_then(json_text)
                .unwrap_or_else(|| field.default.unwrap_or("").to_string());
            draft.values.insert(field.name.to_string(), FieldValue::Text(text));
        }
        draft
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(FieldValue::as_text)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.errors.remove(&name);
        self.values.insert(name, value.into());
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_error(&mut self, name: impl Into<String>, message: impl Into<String>, source: ErrorSource) {
        self.errors.insert(
            name.into(),
            FieldError {
                message: message.into(),
                source,
            },
        );
    }

    pub fn apply_client_errors(&mut self, errors: FieldErrors) {
        for (name, message) in errors {
            self.set_error(name, message, ErrorSource::Client);
        }
    }

    /// Write the first message of each listed field as a server error.
    ///
    /// Fields the server did not mention keep whatever error they had.
    pub fn apply_server_errors(&mut self, errors: &HashMap<String, Vec<String>>) {
        for (name, messages) in errors {
            if let Some(first) = messages.first() {
                self.set_error(name.clone(), first.clone(), ErrorSource::Server);
            }
        }
    }
}

fn json_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}
