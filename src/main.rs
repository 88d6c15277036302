mod backend;
mod config;
mod guard;
mod routes;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");
    for (public, protected) in config.routes.overlaps() {
        tracing::warn!(%public, %protected, "route lists overlap; public entry takes precedence with a session");
    }

    let backend = backend::BackendClient::new(&config.backend_url, config.timeouts).expect("backend client init failed");
    tracing::info!(backend = backend.base_url(), "backend client initialized");

    let port = config.port;
    let state = state::AppState::new(config.routes, Arc::new(backend), config.cookie_secure);
    let app = routes::app(state, &config.site_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, site_dir = %config.site_dir.display(), "brokerage console listening");
    axum::serve(listener, app).await.expect("server failed");
}
