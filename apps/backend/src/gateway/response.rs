use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use bytes::Bytes;

/// What the upstream answered, kept opaque so it can be relayed unchanged.
///
/// A non-2xx status here is not a gateway failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Relay as-is: same status, same content type, same bytes.
    pub fn into_http_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut builder = HttpResponse::build(status);
        if let Some(content_type) = self.content_type {
            builder.insert_header((header::CONTENT_TYPE, content_type));
        }
        builder.body(self.body)
    }
}
