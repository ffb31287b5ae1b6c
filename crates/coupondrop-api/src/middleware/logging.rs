//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::Extensions;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use coupondrop_core::types::{RestrictionScope, SessionKey};

/// Coupon-specific fields attached to a response by inner layers.
#[derive(Debug, Default, PartialEq, Eq)]
struct ResponseTags<'a> {
    /// Truncated session identifier.
    session: Option<&'a str>,
    /// Scope that blocked a claim.
    denied_scope: Option<RestrictionScope>,
}

fn response_tags(extensions: &Extensions) -> ResponseTags<'_> {
    ResponseTags {
        session: extensions.get::<SessionKey>().map(SessionKey::redacted),
        denied_scope: extensions.get::<RestrictionScope>().copied(),
    }
}

/// Logs method, path, status, duration, session, and any claim denial.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let tags = response_tags(response.extensions());
    let denied_scope = tags.denied_scope.map(|scope| scope.to_string());

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        session = tags.session,
        denied_scope = denied_scope.as_deref(),
        "HTTP request"
    );

    response
}
