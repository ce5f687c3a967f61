//! Client for the store's REST API.
//!
//! Every authenticated call presents the session token as a bearer credential.
//! No timeouts and no retries: a failed call is reported once and the user
//! decides whether to try again.

mod models;

pub use models::*;

use reqwest::{multipart, Method, RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::forms::FieldValue;
use crate::resources::Resource;
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// No response came back; the message is shown to the user as is
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("store API responded with {status}")]
    Status { status: StatusCode, envelope: Envelope },

    #[error("unexpected response from store API: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            RemoteError::Status { envelope, .. } => Some(envelope),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    /// Send and read the envelope; any non-2xx status becomes `RemoteError::Status`.
    async fn send(&self, builder: RequestBuilder) -> Result<Envelope, RemoteError> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Store API unreachable");
            RemoteError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = %status, "Store API rejected request");
            let envelope = serde_json::from_str(&body).unwrap_or_default();
            return Err(RemoteError::Status { status, envelope });
        }

        if body.trim().is_empty() {
            return Ok(Envelope::default());
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Fetch one page of a collection. `page` is zero-based; the API counts from one.
    pub async fn paginate(
        &self,
        resource: Resource,
        page: u32,
        rows: u32,
        session: &Session,
    ) -> Result<Page, RemoteError> {
        let path = format!("{}/paginate", resource.segment());
        let builder = self
            .request(Method::GET, &path, Some(session))
            .query(&[("page", page.saturating_add(1)), ("total", rows)]);

        Ok(Page::from(self.send(builder).await?))
    }

    /// Current values of a singleton settings resource (tax, delivery charge).
    pub async fn settings(&self, resource: Resource, session: &Session) -> Result<Value, RemoteError> {
        let builder = self.request(Method::GET, resource.segment(), Some(session));
        let mut envelope = self.send(builder).await?;

        let key = resource.settings_key().unwrap_or("data");
        Ok(envelope
            .extra
            .remove(key)
            .or(envelope.data)
            .unwrap_or(Value::Null))
    }

    /// Submit form fields: multipart when any of them is a file, JSON otherwise.
    pub async fn submit(
        &self,
        method: Method,
        path: &str,
        fields: &[(String, FieldValue)],
        session: &Session,
    ) -> Result<Envelope, RemoteError> {
        let has_files = fields.iter().any(|(_, value)| value.is_file());
        let builder = self.request(method.clone(), path, Some(session));
        let builder = if has_files {
            builder.multipart(multipart_body(fields)?)
        } else {
            builder.json(&json_body(fields))
        };

        debug!(method = %method, path = %path, multipart = has_files, "Submitting form");
        self.send(builder).await
    }

    pub async fn delete(&self, resource: Resource, id: &str, session: &Session) -> Result<Envelope, RemoteError> {
        let path = format!("{}/delete/{}", resource.segment(), id);
        self.send(self.request(Method::DELETE, &path, Some(session))).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, RemoteError> {
        let builder = self.request(Method::POST, "auth/login", None).json(credentials);
        let mut envelope = self.send(builder).await?;

        let token = match envelope.extra.remove("token") {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => return Err(RemoteError::Decode("login response carried no token".to_string())),
        };
        Ok(LoginResponse {
            message: envelope.message,
            token,
        })
    }

    pub async fn logout(&self, session: &Session) -> Result<Envelope, RemoteError> {
        let builder = self
            .request(Method::POST, "auth/logout", Some(session))
            .json(&Map::new());
        self.send(builder).await
    }

    pub async fn profile(&self, token: &str) -> Result<Profile, RemoteError> {
        let builder = self.request(Method::GET, "profile", None).bearer_auth(token);
        let envelope = self.send(builder).await?;

        // Re-read the flattened envelope as the profile shape
        let value = serde_json::to_value(envelope).map_err(|e| RemoteError::Decode(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

fn json_body(fields: &[(String, FieldValue)]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_text()
                .map(|text| (name.to_string(), Value::String(text.to_string())))
        })
        .collect()
}

fn multipart_body(fields: &[(String, FieldValue)]) -> Result<multipart::Form, RemoteError> {
    let mut form = multipart::Form::new();
    for (name, value) in fields {
        match value {
            // Optional fields left empty are not sent at all
            FieldValue::Text(text) if text.trim().is_empty() => {}
            FieldValue::Text(text) => {
                form = form.text(name.to_string(), text.clone());
            }
            FieldValue::File(upload) => {
                let part = multipart::Part::bytes(upload.bytes.to_vec())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.content_type)?;
                form = form.part(name.to_string(), part);
            }
        }
    }
    Ok(form)
}
