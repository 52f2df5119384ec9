//! OpenAPI documentation generated with utoipa
//!
//! Handlers carry `#[utoipa::path]` annotations; this module gathers them
//! into one document served at `/api/openapi.json` and rendered by Swagger
//! UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VIN Cache API",
        description = "Decodes Vehicle Identification Numbers through the NHTSA vPIC service and caches the results.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "vins", description = "VIN lookup, removal and export"),
        (name = "health", description = "Service health monitoring"),
    ),
    components(
        schemas(
            crate::models::DecodedVin,
            crate::models::DecodeError,
            crate::models::DeleteVinSuccess,
            crate::web::handlers::index::WelcomeMessage,
            crate::web::responses::HealthResponse,
            crate::web::responses::DatabaseHealth,
        )
    ),
    paths(
        crate::web::handlers::index::index,
        crate::web::handlers::vins::lookup_vin,
        crate::web::handlers::vins::remove_vin,
        crate::web::handlers::vins::export_vins,
        crate::web::handlers::health::health_check,
        crate::web::handlers::health::readiness_check,
        crate::web::handlers::health::liveness_check,
    )
)]
pub struct ApiDoc;

/// Get the OpenAPI specification with the crate version filled in
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_vin_routes() {
        let document = get_openapi_spec();
        for path in ["/", "/lookup/{vin}", "/remove/{vin}", "/export", "/health", "/ready", "/live"] {
            assert!(document.paths.paths.contains_key(path), "missing {path}");
        }
        assert_eq!(document.info.version, env!("CARGO_PKG_VERSION"));
    }
}
