//! Session guard: runs on every navigation before any screen is built.
//!
//! | sign-in page | token | valid | result                                    |
//! |--------------|-------|-------|-------------------------------------------|
//! | yes          | no    | -     | serve                                     |
//! | yes          | yes   | yes   | redirect home                             |
//! | yes          | yes   | no    | serve (treated as signed out)             |
//! | no           | no    | -     | clear cookie, redirect to sign-in         |
//! | no           | yes   | no    | clear cookie, redirect to sign-in         |
//! | no           | yes   | yes   | serve                                     |
//!
//! Redirects to sign-in carry the requested path as `?redirect=`.
//! Validity is asked of the store API on every navigation; nothing is cached.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::remote::RemoteApi;
use crate::AppState;

/// Answers whether a token still belongs to an administrator.
#[async_trait]
pub trait IdentityCheck: Send + Sync {
    async fn is_valid(&self, token: &str) -> bool;
}

/// Asks the store API's profile endpoint. Any failure counts as invalid.
pub struct RemoteIdentity {
    remote: RemoteApi,
    admin_role: String,
}

impl RemoteIdentity {
    pub fn new(remote: RemoteApi, admin_role: impl Into<String>) -> Self {
        Self {
            remote,
            admin_role: admin_role.into(),
        }
    }
}

#[async_trait]
impl IdentityCheck for RemoteIdentity {
    async fn is_valid(&self, token: &str) -> bool {
        match self.remote.profile(token).await {
            Ok(profile) => {
                let allowed = profile.user.has_role(&self.admin_role);
                if !allowed {
                    warn!(
                        email = profile.user.email.as_deref().unwrap_or("-"),
                        role = %self.admin_role,
                        "Principal lacks the administrative role"
                    );
                }
                allowed
            }
            Err(e) => {
                warn!(error = %e, "Token validation failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Serve,
    RedirectHome,
    /// Always clears the session cookie
    RedirectSignIn { return_to: Option<String> },
}

pub fn decide(path: &str, public: bool, token_present: bool, token_valid: bool) -> GuardDecision {
    match (public, token_present, token_valid) {
        (true, true, true) => GuardDecision::RedirectHome,
        (true, _, _) => GuardDecision::Serve,
        (false, true, true) => GuardDecision::Serve,
        (false, _, _) => GuardDecision::RedirectSignIn {
            return_to: Some(path.to_string()),
        },
    }
}

pub fn is_public(path: &str, sign_in_path: &str) -> bool {
    path.starts_with(sign_in_path)
}

/// Paths the guard never looks at: health probes and static assets.
pub fn is_bypassed(path: &str) -> bool {
    path == "/health"
        || path == "/favicon.ico"
        || path.starts_with("/api/")
        || path.starts_with("/static/")
        || path.ends_with(".png")
}

/// Sign-in location, optionally remembering where the user was headed.
pub fn sign_in_url(sign_in_path: &str, return_to: Option<&str>) -> String {
    let target = return_to.filter(|p| !p.is_empty() && !p.starts_with(sign_in_path));
    match target {
        Some(path) => {
            let query = reqwest::Url::parse_with_params("http://admin.local/", &[("redirect", path)])
                .ok()
                .and_then(|u| u.query().map(str::to_string));
            match query {
                Some(q) => format!("{}?{}", sign_in_path, q),
                None => sign_in_path.to_string(),
            }
        }
        None => sign_in_path.to_string(),
    }
}

/// End the session on this client: clear the cookie and send the user to sign-in.
pub fn invalidate(state: &AppState, jar: CookieJar) -> Response {
    let jar = state.cookies.clear(jar);
    (jar, Redirect::to(&state.config.session.sign_in_path)).into_response()
}

/// axum middleware applying [`decide`] to each request.
pub async fn session_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_bypassed(&path) {
        return next.run(request).await;
    }

    let sign_in_path = &state.config.session.sign_in_path;
    let public = is_public(&path, sign_in_path);
    let session = state.cookies.read(&jar);

    let valid = match &session {
        Some(s) => state.identity.is_valid(s.token()).await,
        None => false,
    };

    let decision = decide(&path, public, session.is_some(), valid);
    debug!(path = %path, public, has_token = session.is_some(), valid, ?decision, "Guard decision");

    match decision {
        GuardDecision::Serve => {
            if let Some(session) = session.filter(|_| valid) {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GuardDecision::RedirectHome => Redirect::to(&state.config.session.home_path).into_response(),
        GuardDecision::RedirectSignIn { return_to } => {
            let jar = state.cookies.clear(jar);
            let location = sign_in_url(sign_in_path, return_to.as_deref());
            (jar, Redirect::to(&location)).into_response()
        }
    }
}
