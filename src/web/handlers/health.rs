//! Health check HTTP handlers

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};

use crate::database::Database;
use crate::web::{
    AppState,
    extractors::RequestContext,
    responses::{DatabaseHealth, HealthResponse, ok},
    utils::log_request,
};

/// Health check endpoint
///
/// Always answers 200; the body reports database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health including database connectivity"),
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    let database = check_database_health(&state.database).await;
    ok(HealthResponse::new(database, state.start_time))
}

/// Readiness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve requests"),
        (status = 503, description = "Database unreachable"),
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    let database = check_database_health(&state.database).await;
    if database.is_connected() {
        ok(serde_json::json!({
            "status": "ready",
            "timestamp": chrono::Utc::now()
        }))
        .into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

/// Liveness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive"),
    )
)]
pub async fn liveness_check(method: Method, uri: Uri, context: RequestContext) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    ok(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now()
    }))
}

async fn check_database_health(database: &Database) -> DatabaseHealth {
    let backend = database.database_type().to_string();
    match database.ping().await {
        Ok(()) => DatabaseHealth {
            status: "connected".to_string(),
            backend,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            DatabaseHealth {
                status: "disconnected".to_string(),
                backend,
                error: Some(e.to_string()),
            }
        }
    }
}
