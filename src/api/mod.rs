//! HTTP API
//! Mission: Expose the webhook, balance lookup and health check over axum

pub mod handlers;

pub use handlers::{ApiError, BalanceResponse};

use crate::{ledger::PaymentLedger, middleware::request_logging};
use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<PaymentLedger>,
    pub secret: Arc<str>,
}

impl AppState {
    pub fn new(ledger: Arc<PaymentLedger>, secret: impl Into<Arc<str>>) -> Self {
        Self {
            ledger,
            secret: secret.into(),
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-signature")]);

    Router::new()
        .route("/", get(handlers::health))
        .route("/mc-pay", post(handlers::receive_payment))
        .route("/balance", get(handlers::get_balance))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
        .with_state(state)
}
