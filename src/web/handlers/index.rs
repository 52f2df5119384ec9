//! Index handler

use axum::{Json, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const WELCOME_MESSAGE: &str = "Welcome to the Vin Decode Application!";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WelcomeMessage {
    #[schema(example = "Welcome to the Vin Decode Application!")]
    pub message: String,
}

/// Greeting served at the root path
#[utoipa::path(
    get,
    path = "/",
    tag = "vins",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeMessage),
    )
)]
pub async fn index() -> impl IntoResponse {
    Json(WelcomeMessage {
        message: WELCOME_MESSAGE.to_string(),
    })
}
