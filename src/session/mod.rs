//! The admin session: one bearer token, kept in one cookie.
//!
//! The cookie is the only place the token lives on the client. Handlers receive
//! the [`Session`] through an extractor instead of reading cookies themselves.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::fmt;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::AppState;

/// An opaque bearer token issued by the store API's login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keep tokens out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Reads, writes and clears the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    config: SessionConfig,
}

impl SessionCookies {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn read(&self, jar: &CookieJar) -> Option<Session> {
        jar.get(&self.config.cookie_name)
            .map(|c| c.value().trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Session::new)
    }

    pub fn establish(&self, jar: CookieJar, session: &Session) -> CookieJar {
        let cookie = Cookie::build((self.config.cookie_name.clone(), session.token().to_string()))
            .path("/")
            .http_only(true)
            .secure(self.config.secure)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::days(self.config.max_age_days))
            .build();
        jar.add(cookie)
    }

    /// Remove the cookie. Clearing an absent cookie is harmless.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(self.config.cookie_name.clone()).path("/"))
    }
}

/// Extractor for handlers behind the guard.
///
/// The guard stores the session it validated in the request extensions; a
/// handler reached without one is rejected.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
