//! Web utility functions

use axum::http::{Method, Uri};
use tracing::debug;

use super::extractors::RequestContext;

/// Log a request as seen by a handler
pub fn log_request(method: &Method, uri: &Uri, context: &RequestContext) {
    debug!(
        method = %method,
        uri = %uri,
        request_id = %context.request_id,
        user_agent = ?context.user_agent,
        real_ip = ?context.real_ip,
        "HTTP request"
    );
}

/// `Content-Disposition` value offering `file_name` as a download
pub fn attachment_disposition(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{sanitized}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition() {
        assert_eq!(
            attachment_disposition("decoded_vins.parquet"),
            "attachment; filename=\"decoded_vins.parquet\""
        );
        assert_eq!(
            attachment_disposition("bad\"name\n.parquet"),
            "attachment; filename=\"badname.parquet\""
        );
    }
}
