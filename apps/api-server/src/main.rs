//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use blog_infra::JwtConfig;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let jwt = JwtConfig::from_env();

    tracing::info!("Starting Blog API Server on {}:{}", config.host, config.port);

    let db = state::connect_storage(&config).await;
    let state = web::Data::new(AppState::new(db.clone(), jwt));

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // Workers are gone by now, so this is normally the last handle.
    #[cfg(feature = "postgres")]
    if let Some(db) = db.and_then(|db| std::sync::Arc::try_unwrap(db).ok()) {
        if let Err(e) = db.close().await {
            tracing::warn!(error = %e, "Database pool did not close cleanly");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
