pub mod api;
pub mod config;
pub mod forms;
pub mod guard;
pub mod remote;
pub mod resources;
pub mod session;

use config::Config;
use std::sync::Arc;

use crate::guard::{IdentityCheck, RemoteIdentity};
use crate::remote::RemoteApi;
use crate::session::SessionCookies;

pub struct AppState {
    pub config: Config,
    pub remote: RemoteApi,
    pub identity: Arc<dyn IdentityCheck>,
    pub cookies: SessionCookies,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let remote = RemoteApi::new(config.backend.base_url.clone());
        let identity = Arc::new(RemoteIdentity::new(
            remote.clone(),
            config.backend.admin_role.clone(),
        ));
        let cookies = SessionCookies::new(config.session.clone());
        Self {
            config,
            remote,
            identity,
            cookies,
        }
    }

    /// Swap the identity check (tests, or a different identity provider)
    pub fn with_identity(mut self, identity: Arc<dyn IdentityCheck>) -> Self {
        self.identity = identity;
        self
    }
}
