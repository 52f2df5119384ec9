//! Request extractors

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Request identifier assigned by the request logging middleware
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Request context information
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_agent: Option<String>,
    pub real_ip: Option<String>,
    pub request_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            user_agent: None,
            real_ip: None,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let real_ip = parts
            .headers
            .get("x-real-ip")
            .or_else(|| parts.headers.get("x-forwarded-for"))
            .and_then(|h| h.to_str().ok())
            .map(|s| s.split(',').next().unwrap_or(s).trim().to_string());

        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            user_agent,
            real_ip,
            request_id,
            timestamp: chrono::Utc::now(),
        })
    }
}
