//! Webhook and balance endpoints
//!
//! Every response body carries `ok`; failures add a stable `error` string.

use crate::{
    api::AppState,
    auth::{self, SignatureError, SIGNATURE_HEADER},
    ledger::{self, ValidationError},
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::any::Any;
use tracing::{error, info, warn};

/// Health check - GET /
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Payment webhook - POST /mc-pay
///
/// Signature is checked against the raw body before it is decoded.
pub async fn receive_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let header = match headers.get(SIGNATURE_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::Signature(SignatureError::Mismatch))?,
        ),
        None => None,
    };

    auth::authenticate(state.secret.as_bytes(), &body, header).map_err(|e| {
        warn!(kind = e.kind(), body_len = body.len(), "❌ Webhook signature rejected");
        ApiError::Signature(e)
    })?;

    let event = ledger::validate(&body).map_err(|e| {
        warn!(reason = %e, "Webhook payload rejected");
        ApiError::Validation(e)
    })?;

    let entry = state.ledger.insert(event);
    info!(
        id = %entry.id,
        payer = %entry.payer,
        amount = entry.amount,
        ledger_size = state.ledger.len(),
        "💰 Payment recorded"
    );

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub ok: bool,
    pub user: String,
    #[serde(serialize_with = "serialize_amount")]
    pub balance: f64,
}

/// Balance lookup - GET /balance?user=<name>
///
/// Query is read as raw pairs so repeated keys never produce a non-JSON
/// rejection; the first `user` wins.
pub async fn get_balance(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user = params
        .iter()
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.trim())
        .unwrap_or_default();
    if user.is_empty() {
        return Err(ApiError::MissingUser);
    }

    let balance = state.ledger.balance_of(user);

    Ok(Json(BalanceResponse {
        ok: true,
        user: user.to_string(),
        balance,
    }))
}

/// Integral amounts go out as JSON integers (`10`, not `10.0`)
fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Render a handler panic as the generic 500 body
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(detail).into_response()
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Signature(SignatureError),
    Validation(ValidationError),
    MissingUser,
    /// Detail is logged, never returned
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signature(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "{}", e),
            Self::MissingUser => write!(f, "Missing user"),
            Self::Internal(detail) => write!(f, "internal error: {}", detail),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Signature(e) => (StatusCode::UNAUTHORIZED, e.message()),
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.message()),
            ApiError::MissingUser => (StatusCode::BAD_REQUEST, "Missing user"),
            ApiError::Internal(detail) => {
                error!(detail = %detail, "🛑 Unhandled error while processing request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}
