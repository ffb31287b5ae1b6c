//! Claim and status handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use coupondrop_ledger::ClaimOutcome;

use crate::dto::response::{ClaimDeniedResponse, ClaimResponse, StatusResponse};
use crate::extractors::ClientIdentity;
use crate::state::AppState;

/// GET /api/coupon
///
/// Hands out the next coupon, or answers 429 with the remaining wait.
pub async fn claim_coupon(State(state): State<AppState>, identity: ClientIdentity) -> Response {
    let outcome = state
        .coordinator
        .claim(&identity.network, &identity.session, Utc::now())
        .await;

    match outcome {
        ClaimOutcome::Allocated { coupon, message } => Json(ClaimResponse {
            success: true,
            coupon,
            message,
        })
        .into_response(),
        ClaimOutcome::Denied {
            scope,
            minutes_remaining,
            message,
        } => {
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ClaimDeniedResponse {
                    error: true,
                    message,
                    minutes_remaining,
                    scope,
                }),
            )
                .into_response();
            let retry_after = minutes_remaining.saturating_mul(60);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            response.extensions_mut().insert(scope);
            response
        }
    }
}

/// GET /api/status
pub async fn claim_status(
    State(state): State<AppState>,
    identity: ClientIdentity,
) -> Json<StatusResponse> {
    let outcome = state
        .coordinator
        .status(&identity.network, &identity.session, Utc::now())
        .await;
    Json(outcome.into())
}
