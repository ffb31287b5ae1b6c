//! `ClientIdentity` extractor — the network and session identities of a request.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};

use coupondrop_core::error::AppError;
use coupondrop_core::types::{NetworkId, SessionKey};

use crate::error::ApiError;
use crate::state::AppState;

/// Network id used when the peer address is unknown.
pub const UNKNOWN_NETWORK: &str = "unknown";

/// The two identities a claim is keyed by.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    /// Client IP address (or forwarded address when trusted).
    pub network: NetworkId,
    /// Browser session from the session cookie.
    pub session: SessionKey,
}

/// Resolve the network identity of a request.
///
/// With `trust_forwarded_for`, the first `X-Forwarded-For` entry wins.
/// Otherwise the socket peer IP is used, falling back to [`UNKNOWN_NETWORK`].
pub fn network_id_from(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_forwarded_for: bool,
) -> NetworkId {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(ip) = forwarded {
            return NetworkId::new(ip);
        }
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| NetworkId::new(addr.ip().to_string()))
        .unwrap_or_else(|| NetworkId::new(UNKNOWN_NETWORK))
}

impl FromRequestParts<AppState> for ClientIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let network = network_id_from(
            &parts.headers,
            &parts.extensions,
            state.config.server.trust_forwarded_for,
        );

        let session = parts
            .extensions
            .get::<SessionKey>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session cookie middleware is not installed"))?;

        Ok(Self { network, session })
    }
}
