pub mod auth;
mod body;
mod collections;
pub mod error;
pub mod screens;
mod settings;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::resources::Resource;
use crate::AppState;
use screens::{DashboardScreen, Screen, Section};

pub use body::FormFields;
pub use error::ApiError;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Every admin screen, sign-in included, goes through the session guard
    let admin_routes = Router::new()
        .route("/", get(dashboard))
        // Authentication
        .route(
            "/authentication/sign-in",
            get(auth::sign_in_page).post(auth::sign_in),
        )
        .route(
            "/authentication/logout",
            get(auth::logout_page).post(auth::logout),
        )
        // Settings
        .route(
            "/settings/:resource",
            get(settings::show).post(settings::save),
        )
        // Collections
        .route(
            "/:resource",
            get(collections::list).post(collections::create),
        )
        .route("/:resource/new", get(collections::new_form))
        .route("/:resource/:id", post(collections::update))
        .route("/:resource/:id/edit", post(collections::edit_form))
        .route("/:resource/:id/delete", post(collections::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::session_guard,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(state.config.uploads.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn dashboard() -> Screen<DashboardScreen> {
    Screen(
        StatusCode::OK,
        DashboardScreen {
            title: "Dashboard",
            sections: Resource::ALL.into_iter().map(Section::of).collect(),
        },
    )
}
