//! Singleton settings (tax, delivery charge): read whole, saved in place.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::body::FormFields;
use super::error::ApiError;
use super::screens::{outcome_status, Screen, SettingsScreen};
use crate::forms::{pipeline, Modal, Outcome};
use crate::guard;
use crate::resources::Resource;
use crate::session::Session;
use crate::AppState;

fn settings_resource(segment: &str) -> Result<Resource, ApiError> {
    let resource: Resource = segment.parse()?;
    if !resource.is_settings() {
        return Err(ApiError::not_found(format!("{} has no settings", resource.title())));
    }
    Ok(resource)
}

fn record_id(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    let resource = settings_resource(&segment)?;

    let record = match state.remote.settings(resource, &session).await {
        Ok(record) => record,
        Err(e) if e.is_unauthorized() => return Ok(guard::invalidate(&state, jar)),
        Err(e) => return Err(e.into()),
    };

    let mut modal = Modal::new(resource.schema(&state.config.uploads));
    modal.open_edit(record_id(&record), record.clone());

    let screen = SettingsScreen {
        resource,
        title: resource.title(),
        record,
        modal,
        result: None,
    };
    Ok(Screen(StatusCode::OK, screen).into_response())
}

pub async fn save(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path(segment): Path<String>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let resource = settings_resource(&segment)?;

    let mut modal = Modal::new(resource.schema(&state.config.uploads));
    modal.open_create();
    fields.apply(modal.draft_mut());

    let target = modal
        .target(resource)
        .ok_or_else(|| ApiError::internal("form is not open"))?;
    let outcome = pipeline::submit(&mut modal, &target, &state.remote, &session).await?;

    let record = match &outcome {
        Outcome::SignedOut => return Ok(guard::invalidate(&state, jar)),
        Outcome::Saved { .. } => match state.remote.settings(resource, &session).await {
            Ok(record) => record,
            Err(e) if e.is_unauthorized() => return Ok(guard::invalidate(&state, jar)),
            Err(e) => {
                warn!(resource = %resource, error = %e, "Could not reload settings after save");
                Value::Null
            }
        },
        Outcome::Invalid | Outcome::Rejected { .. } => Value::Null,
    };

    let status = outcome_status(&outcome);
    let screen = SettingsScreen {
        resource,
        title: resource.title(),
        record,
        modal,
        result: Some(outcome),
    };
    Ok(Screen(status, screen).into_response())
}
