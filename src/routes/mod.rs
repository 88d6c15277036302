//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the session actions and CRUD forwarding under
//! `/api`, a health probe, and the dashboard's pages from the static site
//! directory as the fallback. The route guard wraps all of it; paths under
//! the excluded prefixes (including `/api`) skip classification.

pub mod resources;
pub mod session;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::guard::middleware::route_guard;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState, site_dir: &Path) -> Router {
    let site = ServeDir::new(site_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/session/login", post(session::login))
        .route("/api/session/signup", post(session::signup))
        .merge(resources::router())
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
