//! Web layer module
//!
//! This module provides the HTTP interface for the VIN cache. Handlers are
//! thin and delegate to the service layer; this module owns the router,
//! the middleware stack and server lifecycle.
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers organized by domain
//! - **Responses**: error to status mapping and the error envelope
//! - **Extractors**: request context extraction
//! - **Middleware**: request logging and security headers
//! - **OpenAPI**: generated documentation served by Swagger UI

use anyhow::Result;
use axum::{
    Router,
    routing::{delete, get},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    database::{
        Database,
        repositories::{DecodedVinSeaOrmRepository, DecodedVinStore},
    },
    decoder::VinDecoder,
    services::{VinExportService, VinLookupService, VinRemovalService},
};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod utils;

// Re-export commonly used types
pub use extractors::RequestContext;
pub use responses::{ApiResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub lookup_service: VinLookupService,
    pub removal_service: VinRemovalService,
    pub export_service: VinExportService,
    /// Application start time for uptime calculation
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Wire the services over the SeaORM store and the given decoder
    pub fn new(database: Database, config: Config, decoder: Arc<dyn VinDecoder>) -> Self {
        let store: Arc<dyn DecodedVinStore> = Arc::new(DecodedVinSeaOrmRepository::new(
            database.connection(),
            config.export.batch_size,
        ));

        Self {
            lookup_service: VinLookupService::new(store.clone(), decoder),
            removal_service: VinRemovalService::new(store.clone()),
            export_service: VinExportService::new(store),
            database,
            config,
            start_time: chrono::Utc::now(),
        }
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/live", get(handlers::health::liveness_check))
        // OpenAPI documentation
        .merge(openapi_routes())
        // VIN endpoints
        .route("/", get(handlers::index::index))
        .route("/lookup/{vin}", get(handlers::vins::lookup_vin))
        .route("/remove/{vin}", delete(handlers::vins::remove_vin))
        .route("/export", get(handlers::vins::export_vins))
        .route("/export/", get(handlers::vins::export_vins))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        // Shared state
        .with_state(state)
}

/// OpenAPI documentation routes
fn openapi_routes() -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;

    // Serves both /docs and /api/openapi.json
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", openapi::get_openapi_spec()))
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        let app = create_app(state);

        Ok(Self { app, addr })
    }

    /// Serve until `cancellation_token` fires.
    ///
    /// The outcome of binding the listener is reported through
    /// `ready_signal` before any request is accepted.
    pub async fn serve_with_cancellation(
        self,
        ready_signal: oneshot::Sender<Result<()>>,
        cancellation_token: CancellationToken,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                let shutdown_signal = async move {
                    cancellation_token.cancelled().await;
                    tracing::info!("Web server received cancellation signal, shutting down gracefully");
                };

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal)
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::MockVinDecoder;

    async fn test_state(host: &str, port: u16) -> AppState {
        let database = Database::new_in_memory().await.unwrap();
        database.migrate().await.unwrap();

        let mut config = Config::default();
        config.web.host = host.to_string();
        config.web.port = port;

        AppState::new(database, config, Arc::new(MockVinDecoder::new()))
    }

    #[tokio::test]
    async fn test_server_signals_ready_and_stops_on_cancel() {
        let server = WebServer::new(test_state("127.0.0.1", 0).await).unwrap();
        let token = CancellationToken::new();
        let (ready_tx, ready_rx) = oneshot::channel();

        let handle = tokio::spawn(server.serve_with_cancellation(ready_tx, token.clone()));

        ready_rx.await.unwrap().unwrap();
        token.cancel();

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let app = create_app(test_state("127.0.0.1", 0).await);
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/lookup/1XPWD40X1ED215307")
            .header("origin", "http://dashboard.example")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_bind_failure_is_signalled() {
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let server = WebServer::new(test_state("127.0.0.1", port).await).unwrap();
        let (ready_tx, ready_rx) = oneshot::channel();

        let result = server
            .serve_with_cancellation(ready_tx, CancellationToken::new())
            .await;

        assert!(result.is_err());
        assert!(ready_rx.await.unwrap().is_err());
    }
}
