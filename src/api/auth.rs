//! Sign-in and logout screens.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::body::FormFields;
use super::screens::{LogoutScreen, Screen, SignInScreen};
use crate::forms::{apply_failure, FormDraft};
use crate::guard;
use crate::remote::Credentials;
use crate::resources::sign_in_schema;
use crate::session::Session;
use crate::AppState;

const LOGOUT_PROMPT: &str = "Are you sure you want to logout?";

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

/// Only same-site paths are honoured as post sign-in targets.
fn return_target(state: &AppState, redirect: Option<&str>) -> String {
    let session = &state.config.session;
    match redirect {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with(&session.sign_in_path) =>
        {
            path.to_string()
        }
        _ => session.home_path.clone(),
    }
}

/// Never echo a password back to the browser; its error, if any, stays.
fn forget_password(form: &mut FormDraft) {
    let error = form.error("password").cloned();
    form.set_value("password", "");
    if let Some(error) = error {
        form.set_error("password", error.message, error.source);
    }
}

pub async fn sign_in_page(Query(query): Query<RedirectQuery>) -> Screen<SignInScreen> {
    Screen(
        StatusCode::OK,
        SignInScreen {
            form: FormDraft::defaults(&sign_in_schema()),
            banner: None,
            redirect: query.redirect,
        },
    )
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RedirectQuery>,
    jar: CookieJar,
    fields: FormFields,
) -> Response {
    let schema = sign_in_schema();
    let mut form = FormDraft::defaults(&schema);
    fields.apply(&mut form);

    if let Err(errors) = schema.validate(&form) {
        form.apply_client_errors(errors);
        forget_password(&mut form);
        let screen = SignInScreen {
            form,
            banner: None,
            redirect: query.redirect,
        };
        return Screen(StatusCode::UNPROCESSABLE_ENTITY, screen).into_response();
    }

    let credentials = Credentials {
        email: form.text("email").unwrap_or_default().trim().to_string(),
        password: form.text("password").unwrap_or_default().to_string(),
    };

    match state.remote.login(&credentials).await {
        Ok(login) => {
            info!(email = %credentials.email, "Signed in");
            let jar = state.cookies.establish(jar, &Session::new(login.token));
            let target = return_target(&state, query.redirect.as_deref());
            (jar, Redirect::to(&target)).into_response()
        }
        Err(e) => {
            // A 401 here means bad credentials, not an expired session
            warn!(email = %credentials.email, error = %e, "Sign-in failed");
            let failure = apply_failure(&mut form, &e);
            forget_password(&mut form);
            let status = e.status().unwrap_or(StatusCode::BAD_GATEWAY);
            let screen = SignInScreen {
                form,
                banner: failure.banner,
                redirect: query.redirect,
            };
            Screen(status, screen).into_response()
        }
    }
}

pub async fn logout_page() -> Screen<LogoutScreen> {
    Screen(
        StatusCode::OK,
        LogoutScreen {
            prompt: LOGOUT_PROMPT,
            banner: None,
        },
    )
}

/// Ask the store API to end the session, then forget the token locally.
///
/// When the store API refuses for any reason other than an expired token the
/// user stays signed in and sees why.
pub async fn logout(State(state): State<Arc<AppState>>, session: Session, jar: CookieJar) -> Response {
    match state.remote.logout(&session).await {
        Ok(envelope) => {
            info!(message = envelope.message.as_deref().unwrap_or("-"), "Signed out");
            guard::invalidate(&state, jar)
        }
        Err(e) if e.is_unauthorized() => guard::invalidate(&state, jar),
        Err(e) => {
            warn!(error = %e, "Logout failed");
            let banner = e
                .envelope()
                .and_then(|env| env.message.clone())
                .unwrap_or_else(|| e.to_string());
            let status = e.status().unwrap_or(StatusCode::BAD_GATEWAY);
            let screen = LogoutScreen {
                prompt: LOGOUT_PROMPT,
                banner: Some(banner),
            };
            Screen(status, screen).into_response()
        }
    }
}
