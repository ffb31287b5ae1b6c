//! Session cookie middleware.
//!
//! Every request leaves this layer with a [`SessionKey`] in its extensions,
//! and the matching response carries it back out for the request log.
//! Visitors without the cookie get a fresh identifier, set on the response.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;
use uuid::Uuid;

use coupondrop_core::types::SessionKey;

use crate::state::AppState;

/// Attaches the visitor's session key, issuing a cookie when there is none.
pub async fn session_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.as_str();

    if let Some(existing) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        let session = SessionKey::new(existing.value());
        request.extensions_mut().insert(session.clone());
        let mut response = next.run(request).await;
        response.extensions_mut().insert(session);
        return response;
    }

    let session = SessionKey::new(Uuid::new_v4().simple().to_string());
    debug!(session = %session.redacted(), "Issuing session cookie");
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    let max_age_hours =
        i64::try_from(state.config.session.max_age_hours).unwrap_or(i64::MAX / 3600);
    let cookie = Cookie::build((cookie_name.to_string(), session.as_str().to_string()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(max_age_hours));

    let mut response = (jar.add(cookie), response).into_response();
    response.extensions_mut().insert(session);
    response
}
