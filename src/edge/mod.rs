//! Edge passthrough.
//!
//! Static hosts tend to answer every asset with 200. The status path must
//! reach the client with exactly the status, headers and body the handler
//! produced.
//!
//! Route order is what keeps `/down` away from [`ServeDir`]: the status route
//! is matched before the asset fallback, so a prerendered `down` file is never
//! served. [`relay`] sits outermost and hands the status response on without
//! normalizing its code; it only logs codes other than 200 and 503.

use std::path::Path;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tower_http::services::ServeDir;

/// Path of the machine status endpoint.
pub const STATUS_PATH: &str = "/down";

/// Relay the status response verbatim; pass everything else through.
pub async fn relay(request: Request, next: Next) -> Response {
    if request.uri().path() != STATUS_PATH {
        return next.run(request).await;
    }

    let (parts, body) = next.run(request).await.into_parts();
    if parts.status != StatusCode::OK && parts.status != StatusCode::SERVICE_UNAVAILABLE {
        tracing::warn!(status = %parts.status, "Unexpected status on {}", STATUS_PATH);
    }
    Response::from_parts(parts, body)
}

/// Service for prebuilt site assets under `dir`.
pub fn static_assets(dir: &Path) -> ServeDir {
    ServeDir::new(dir).append_index_html_on_directories(true)
}
