//! MC-Pay Webhook Library
//!
//! Verifies HMAC-signed payment webhooks, keeps a bounded in-memory ledger of
//! accepted payments and answers per-payer balance queries.

pub mod api;
pub mod auth;
pub mod config;
pub mod ledger;
pub mod middleware;
pub mod models;

pub use api::{router, AppState};
pub use config::{Environment, WebhookConfig};
pub use ledger::{PaymentLedger, LEDGER_CAP};
pub use models::{LedgerEntry, PaymentEvent};
