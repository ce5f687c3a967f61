//! Screen payloads: what each admin page is given to render.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::forms::{FormDraft, Modal, Outcome};
use crate::resources::Resource;

#[derive(Debug, Serialize)]
pub struct Section {
    pub resource: Resource,
    pub title: &'static str,
    pub href: String,
}

impl Section {
    pub fn of(resource: Resource) -> Self {
        Self {
            resource,
            title: resource.title(),
            href: href(resource),
        }
    }
}

/// Where a resource's screen lives in the admin.
pub fn href(resource: Resource) -> String {
    if resource.is_settings() {
        format!("/settings/{}", resource.segment())
    } else {
        format!("/{}", resource.segment())
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardScreen {
    pub title: &'static str,
    pub sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
pub struct SignInScreen {
    pub form: FormDraft,
    pub banner: Option<String>,
    /// Where to go after a successful sign-in
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutScreen {
    pub prompt: &'static str,
    pub banner: Option<String>,
}

/// One page of a collection, as the table shows it.
#[derive(Debug, Serialize)]
pub struct ListScreen {
    pub resource: Resource,
    pub title: &'static str,
    /// Zero-based
    pub page: u32,
    pub rows_per_page: u32,
    pub total: u64,
    pub rows: Vec<Value>,
}

/// One option of a select field filled from another resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: Value,
    pub label: String,
}

impl Choice {
    /// Build an option from a listed row (`id` and `name`); rows without an id are skipped.
    pub fn from_row(row: &Value) -> Option<Self> {
        let value = row.get("id").filter(|id| !id.is_null())?.clone();
        let label = match (row.get("name"), &value) {
            (Some(Value::String(name)), _) => name.clone(),
            (_, Value::String(id)) => id.clone(),
            (_, id) => id.to_string(),
        };
        Some(Self { value, label })
    }
}

/// Field name to the options offered for it.
pub type Choices = BTreeMap<&'static str, Vec<Choice>>;

/// A create/update modal, before or after a submission.
#[derive(Debug, Serialize)]
pub struct FormScreen {
    pub resource: Resource,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    pub modal: Modal,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub choices: Choices,
    /// Reloaded once the user acknowledges a save
    pub refetch: String,
}

#[derive(Debug, Serialize)]
pub struct SettingsScreen {
    pub resource: Resource,
    pub title: &'static str,
    pub record: Value,
    pub modal: Modal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
}

/// A screen with the status code it is served under.
pub struct Screen<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for Screen<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

/// Status code for a finished submission. Client-side blocks are 422; server
/// rejections keep the store API's status, transport failures are 502.
pub fn outcome_status(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::Saved { .. } => StatusCode::OK,
        Outcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Rejected { status: Some(code) } => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        Outcome::Rejected { status: None } => StatusCode::BAD_GATEWAY,
        Outcome::SignedOut => StatusCode::UNAUTHORIZED,
    }
}
