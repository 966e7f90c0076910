mod backend;
mod config;
mod error;
mod lead;
mod routes;
mod services;
mod state;
mod views;

use config::BackendSetup;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();
    let port = config.port;

    match &config.backend {
        BackendSetup::Configured(backend) => {
            tracing::info!(url = %backend.url, admins = config.admins.len(), "backend configured");
        }
        BackendSetup::Missing(missing) => {
            tracing::warn!(?missing, "backend not configured; serving setup-required responses");
        }
    }

    if config.admins.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; no user can delete or export leads");
    }

    let state = state::AppState::from_config(config).expect("backend client init failed");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "walkin-crm listening");
    axum::serve(listener, app).await.expect("server failed");
}
