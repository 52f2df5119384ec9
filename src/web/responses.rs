//! HTTP response types and utilities
//!
//! Successful VIN operations answer with their bare JSON bodies. Failures
//! that are not a VIN rejection use the [`ApiResponse`] envelope, built by
//! [`handle_error`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::errors::AppError;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response with details
    pub fn error_with_details(message: String, details: HashMap<String, String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: Some(details),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Convert AppError to the matching HTTP status and error envelope
///
/// Client errors are logged at `warn`, server-side failures at `error`.
pub fn handle_error(error: AppError) -> Response {
    let (status, message, details) = match &error {
        AppError::InvalidVin(reason) => (
            StatusCode::BAD_REQUEST,
            format!("Invalid VIN: {reason}"),
            None,
        ),
        AppError::NotFound { resource, .. } => (
            StatusCode::NOT_FOUND,
            format!("{resource} not found."),
            None,
        ),
        AppError::Decoder(decoder_error) if decoder_error.is_timeout() => (
            StatusCode::GATEWAY_TIMEOUT,
            "VIN decoder timed out".to_string(),
            None,
        ),
        AppError::Decoder(decoder_error) => (
            StatusCode::BAD_GATEWAY,
            "VIN decoder request failed".to_string(),
            Some(HashMap::from([(
                "cause".to_string(),
                decoder_error.to_string(),
            )])),
        ),
        AppError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database operation failed".to_string(),
            None,
        ),
        AppError::Export { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Export failed".to_string(),
            None,
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {message}"),
            None,
        ),
        AppError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {message}"),
            None,
        ),
    };

    if status.is_server_error() {
        error!(status = status.as_u16(), error = %error, "Request failed");
    } else {
        warn!(status = status.as_u16(), error = %error, "Request rejected");
    }

    let response = match details {
        Some(details) => ApiResponse::<()>::error_with_details(message, details),
        None => ApiResponse::<()>::error(message),
    };

    (status, Json(response)).into_response()
}

/// Success response helper
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// Service health status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub database: DatabaseHealth,
}

impl HealthResponse {
    pub fn new(database: DatabaseHealth, start_time: chrono::DateTime<chrono::Utc>) -> Self {
        let status = if database.is_connected() {
            "healthy"
        } else {
            "unhealthy"
        };

        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: (chrono::Utc::now() - start_time).num_seconds(),
            database,
        }
    }
}

/// Database health status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatabaseHealth {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecoderError;
    use crate::models::Vin;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = handle_error(AppError::not_found("VIN", "4V4NC9EJXEN171694"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VIN not found.");
    }

    #[tokio::test]
    async fn test_invalid_vin_maps_to_400() {
        let error = Vin::normalize("SHORT").unwrap_err();
        let response = handle_error(error.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid VIN: expected 17 characters, got 5");
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_502_with_cause() {
        let response = handle_error(AppError::Decoder(DecoderError::Status {
            status: 503,
            url: "http://upstream/".to_string(),
        }));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(
            body["details"]["cause"],
            "upstream returned HTTP 503 for http://upstream/"
        );
    }

    #[tokio::test]
    async fn test_database_failure_hides_internals() {
        let response = handle_error(AppError::Database(sea_orm::DbErr::Custom(
            "secret connection string".to_string(),
        )));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Database operation failed");
    }
}
