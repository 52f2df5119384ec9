//! VIN lookup, removal and export HTTP handlers
//!
//! Handlers stay thin: they hand the raw path segment to the matching
//! service and translate the outcome into a response.

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::export::write_parquet;
use crate::models::{DecodeError, DecodedVin, DeleteVinSuccess};
use crate::services::LookupOutcome;
use crate::web::{
    AppState,
    extractors::RequestContext,
    responses::handle_error,
    utils::{attachment_disposition, log_request},
};

/// Decode a VIN, serving it from the cache when possible
#[utoipa::path(
    get,
    path = "/lookup/{vin}",
    tag = "vins",
    params(
        ("vin" = String, Path, description = "17 character VIN, case-insensitive", example = "1XPWD40X1ED215307"),
    ),
    responses(
        (status = 200, description = "Decoded VIN; `cached` tells whether it came from the cache", body = DecodedVin),
        (status = 400, description = "Malformed VIN, or the decoder rejected it (body carries ErrorCode, ErrorText, AdditionalErrorText)", body = DecodeError),
        (status = 502, description = "Upstream decoder failed"),
        (status = 504, description = "Upstream decoder timed out"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn lookup_vin(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> Response {
    log_request(&method, &uri, &context);

    match state.lookup_service.lookup(&vin).await {
        Ok(LookupOutcome::Found(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(LookupOutcome::Invalid(decode_error)) => {
            warn!(
                vin = %vin,
                error_code = %decode_error.error_code,
                request_id = %context.request_id,
                "VIN rejected by decoder"
            );
            (StatusCode::BAD_REQUEST, Json(decode_error)).into_response()
        }
        Err(error) => handle_error(error),
    }
}

/// Remove a VIN from the cache
#[utoipa::path(
    delete,
    path = "/remove/{vin}",
    tag = "vins",
    params(
        ("vin" = String, Path, description = "17 character VIN, case-insensitive", example = "1XPWD40X1ED215307"),
    ),
    responses(
        (status = 200, description = "VIN removed", body = DeleteVinSuccess),
        (status = 400, description = "Malformed VIN"),
        (status = 404, description = "VIN not found."),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn remove_vin(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> Response {
    log_request(&method, &uri, &context);

    match state.removal_service.remove(&vin).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(error) => handle_error(error),
    }
}

/// Download every cached VIN as an Apache Parquet file
#[utoipa::path(
    get,
    path = "/export",
    tag = "vins",
    responses(
        (status = 200, description = "Parquet file with one row per cached VIN", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 500, description = "Export failed"),
    )
)]
pub async fn export_vins(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> Response {
    log_request(&method, &uri, &context);

    let records = state.export_service.export_all();
    match write_parquet(records, state.config.export.batch_size).await {
        Ok(file) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    attachment_disposition(&state.config.export.file_name),
                ),
            ],
            file,
        )
            .into_response(),
        Err(error) => handle_error(error),
    }
}
