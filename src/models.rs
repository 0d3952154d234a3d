//! Payment Models
//! Mission: Define the wire event and the trusted ledger record

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Event type accepted by the webhook
pub const PAY_RECEIVED: &str = "pay_received";

/// A schema-valid payment notification.
///
/// Only constructed by [`crate::ledger::validate`]; the untrusted JSON never
/// deserializes straight into this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEvent {
    pub payer: String,
    /// Sign is unconstrained, refunds arrive as negative amounts
    pub amount: f64,
    /// Caller-supplied timestamp, stored verbatim and never parsed
    pub ts: String,
    pub raw: String,
}

/// A payment accepted into the ledger. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub payer: String,
    pub amount: f64,
    pub raw: String,
    pub ts: String,
    pub received_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Case-insensitive payer match against an already-lowercased key
    pub fn is_payer(&self, payer_lower: &str) -> bool {
        self.payer.to_lowercase() == payer_lower
    }
}
