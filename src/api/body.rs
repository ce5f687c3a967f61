//! Reading submitted form bodies.
//!
//! Browsers post entity forms as `multipart/form-data` when a file input is
//! present and as `application/x-www-form-urlencoded` otherwise; scripted
//! clients may send a flat JSON object. All three land in the same list of
//! named field values.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::forms::{FieldValue, FormDraft, Upload};

#[derive(Debug, Default)]
pub struct FormFields(pub Vec<(String, FieldValue)>);

impl FormFields {
    /// Copy the submitted values onto a draft, leaving unsent fields alone.
    pub fn apply(self, draft: &mut FormDraft) {
        for (name, value) in self.0 {
            draft.set_value(name, value);
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            let fields = object
                .into_iter()
                .filter_map(|(name, value)| json_text(value).map(|t| (name, FieldValue::Text(t))))
                .collect();
            return Ok(FormFields(fields));
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(FormFields(
            pairs
                .into_iter()
                .map(|(name, value)| (name, FieldValue::Text(value)))
                .collect(),
        ))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut fields = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| guess_mime(&file_name));
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                FieldValue::File(Upload::new(file_name, content_type, bytes))
            }
            None => FieldValue::Text(
                field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?,
            ),
        };
        fields.push((name, value));
    }

    Ok(FormFields(fields))
}

fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn json_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
