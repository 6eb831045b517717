use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// HTTP header name for correlation ID
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// HTTP header name for request ID, accepted as a fallback
pub const X_REQUEST_ID: &str = "x-request-id";

/// Longest caller-supplied id that is accepted as-is
const MAX_ID_LEN: usize = 128;

/// Correlation ID stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse a caller-supplied id when it is printable and short, otherwise
    /// mint a new one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_CORRELATION_ID)
            .or_else(|| headers.get(X_REQUEST_ID))
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_ID_LEN)
            .map(|s| Self(s.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axum middleware: tag the request span with a correlation id and echo it
/// back on the response.
///
/// Install with `axum::middleware::from_fn(telemetry::correlation::propagate)`.
pub async fn propagate(mut req: Request, next: Next) -> Response {
    let id = CorrelationId::from_headers(req.headers());
    req.extensions_mut().insert(id.clone());

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(X_CORRELATION_ID, value);
    }
    response
}
