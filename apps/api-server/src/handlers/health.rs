//! Health check endpoint.

use actix_web::{HttpResponse, web};

use blog_shared::dto::HealthResponse;

use crate::state::AppState;

/// GET /health - 200 when storage answers, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.storage_healthy().await;

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        service: "blog-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage_name().to_string(),
        timestamp: chrono::Utc::now(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
