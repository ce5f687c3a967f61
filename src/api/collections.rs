//! Paginated resources: list, create, update and delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::body::FormFields;
use super::error::ApiError;
use super::screens::{href, outcome_status, Choice, Choices, FormScreen, ListScreen, Screen};
use crate::forms::{pipeline, Modal, Outcome};
use crate::guard;
use crate::remote::RemoteError;
use crate::resources::Resource;
use crate::session::Session;
use crate::AppState;

const DEFAULT_ROWS: u32 = 10;
const MAX_ROWS: u32 = 100;
/// Options fetched for a select field filled from another resource
const CHOICE_ROWS: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Zero-based page index
    pub page: Option<u32>,
    pub rows: Option<u32>,
}

/// Resolve a path segment to a paginated resource.
fn collection(segment: &str) -> Result<Resource, ApiError> {
    let resource: Resource = segment.parse()?;
    if resource.is_settings() {
        return Err(ApiError::not_found(format!(
            "{} is edited at {}",
            resource.title(),
            href(resource)
        )));
    }
    Ok(resource)
}

fn modal_for(state: &AppState, resource: Resource) -> Modal {
    Modal::new(resource.schema(&state.config.uploads))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path(segment): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;
    let page = query.page.unwrap_or(0);
    // The store API counts pages from one
    if page.checked_add(1).is_none() {
        return Err(ApiError::bad_request(format!("Page {} is out of range", page)));
    }
    let rows = query.rows.unwrap_or(DEFAULT_ROWS).clamp(1, MAX_ROWS);

    match state.remote.paginate(resource, page, rows, &session).await {
        Ok(fetched) => {
            let screen = ListScreen {
                resource,
                title: resource.title(),
                page,
                rows_per_page: rows,
                total: fetched.total,
                rows: fetched.data,
            };
            Ok(Screen(StatusCode::OK, screen).into_response())
        }
        Err(e) if e.is_unauthorized() => Ok(guard::invalidate(&state, jar)),
        Err(e) => Err(e.into()),
    }
}

/// Options for the resource's select fields. Only a rejected session is an
/// error; any other failure leaves the options empty.
async fn load_choices(
    state: &AppState,
    resource: Resource,
    session: &Session,
) -> Result<Choices, RemoteError> {
    let mut choices = Choices::new();
    let Some((field, source)) = resource.choice_source() else {
        return Ok(choices);
    };

    match state.remote.paginate(source, 0, CHOICE_ROWS, session).await {
        Ok(fetched) => {
            let options = fetched.data.iter().filter_map(Choice::from_row).collect();
            choices.insert(field, options);
        }
        Err(e) if e.is_unauthorized() => return Err(e),
        Err(e) => {
            warn!(resource = %resource, source = %source, error = %e, "Could not load form options");
        }
    }
    Ok(choices)
}

/// Serve a form screen together with its select options.
async fn with_choices(
    state: &AppState,
    resource: Resource,
    modal: Modal,
    result: Option<Outcome>,
    session: &Session,
    jar: CookieJar,
) -> Response {
    match load_choices(state, resource, session).await {
        Ok(choices) => form_screen(resource, modal, result, choices).into_response(),
        Err(_) => {
            warn!(resource = %resource, "Session rejected while loading form options, signing out");
            guard::invalidate(state, jar)
        }
    }
}

/// Empty create form, seeded with defaults.
pub async fn new_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;
    let mut modal = modal_for(&state, resource);
    modal.open_create();
    Ok(with_choices(&state, resource, modal, None, &session, jar).await)
}

/// Update form prefilled from the table row the user picked.
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path((segment, id)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;
    let mut modal = modal_for(&state, resource);
    modal.open_edit(id, resource.edit_record(record));
    Ok(with_choices(&state, resource, modal, None, &session, jar).await)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path(segment): Path<String>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;
    let mut modal = modal_for(&state, resource);
    modal.open_create();
    fields.apply(modal.draft_mut());

    submit(&state, resource, modal, &session, jar).await
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path((segment, id)): Path<(String, String)>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;
    let mut modal = modal_for(&state, resource);
    modal.open_edit(id, Value::Object(Map::new()));
    fields.apply(modal.draft_mut());

    submit(&state, resource, modal, &session, jar).await
}

/// Delete one record, then show the list again.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    jar: CookieJar,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let resource = collection(&segment)?;

    match state.remote.delete(resource, &id, &session).await {
        Ok(_) => {
            info!(resource = %resource, id = %id, "Record deleted");
            Ok(Redirect::to(&href(resource)).into_response())
        }
        Err(e) if e.is_unauthorized() => Ok(guard::invalidate(&state, jar)),
        Err(e) => {
            warn!(resource = %resource, id = %id, error = %e, "Delete failed");
            Err(e.into())
        }
    }
}

async fn submit(
    state: &AppState,
    resource: Resource,
    mut modal: Modal,
    session: &Session,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let target = modal
        .target(resource)
        .ok_or_else(|| ApiError::internal("form is not open"))?;

    let outcome = pipeline::submit(&mut modal, &target, &state.remote, session).await?;
    match outcome {
        Outcome::SignedOut => Ok(guard::invalidate(state, jar)),
        // The modal stays open for another try, so it needs its options again
        Outcome::Invalid | Outcome::Rejected { .. } => {
            Ok(with_choices(state, resource, modal, Some(outcome), session, jar).await)
        }
        Outcome::Saved { .. } => {
            Ok(form_screen(resource, modal, Some(outcome), Choices::new()).into_response())
        }
    }
}

fn form_screen(
    resource: Resource,
    modal: Modal,
    result: Option<Outcome>,
    choices: Choices,
) -> Screen<FormScreen> {
    let status = result.as_ref().map(outcome_status).unwrap_or(StatusCode::OK);
    Screen(
        status,
        FormScreen {
            resource,
            title: resource.title(),
            result,
            modal,
            choices,
            refetch: href(resource),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_excludes_settings() {
        assert_eq!(collection("category").unwrap(), Resource::Category);
        assert_eq!(
            collection("tax").unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            collection("orders").unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_form_screen_status() {
        let state = AppState::new(crate::config::Config::default());
        let mut modal = modal_for(&state, Resource::Coupon);
        modal.open_create();

        let Screen(status, screen) = form_screen(
            Resource::Coupon,
            modal,
            Some(Outcome::Invalid),
            Choices::new(),
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(screen.refetch, "/coupon");
    }

    #[tokio::test]
    async fn test_resources_without_options_skip_the_fetch() {
        // Nothing listens here; a fetch would fail and be logged, not returned
        let mut config = crate::config::Config::default();
        config.backend.base_url = "http://127.0.0.1:9/api/v1".to_string();
        let state = AppState::new(config);

        let choices = load_choices(&state, Resource::Coupon, &Session::new("t"))
            .await
            .unwrap();
        assert!(choices.is_empty());

        let choices = load_choices(&state, Resource::Product, &Session::new("t"))
            .await
            .unwrap();
        assert!(choices.is_empty());
    }
}
