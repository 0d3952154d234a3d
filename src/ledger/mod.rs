//! Payment Ledger
//! Mission: Keep the most recent payments in memory and answer balance queries
//!
//! The ledger is bounded: every insert prepends and then drops the oldest
//! entries beyond capacity, so memory never exceeds `capacity` entries.

pub mod validation;

pub use validation::{validate, ValidationError};

use crate::models::{LedgerEntry, PaymentEvent};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

/// Default number of retained entries
pub const LEDGER_CAP: usize = 200;

struct LedgerState {
    /// Newest first
    entries: VecDeque<LedgerEntry>,
    last_received_at: Option<DateTime<Utc>>,
}

/// Bounded, newest-first, in-memory payment store.
///
/// Inserts and reads share one lock, so a reader never sees a store that
/// has been prepended but not yet truncated.
pub struct PaymentLedger {
    capacity: usize,
    state: RwLock<LedgerState>, // parking_lot: no await while held
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::with_capacity(LEDGER_CAP)
    }

    /// Ledger retaining at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: RwLock::new(LedgerState {
                entries: VecDeque::with_capacity(capacity + 1),
                last_received_at: None,
            }),
        }
    }

    /// Record a validated event, evicting the oldest entries past capacity.
    pub fn insert(&self, event: PaymentEvent) -> LedgerEntry {
        let mut state = self.state.write();

        // Wall clock may step backwards; receivedAt must not
        let now = Utc::now();
        let received_at = match state.last_received_at {
            Some(last) if last > now => last,
            _ => now,
        };
        state.last_received_at = Some(received_at);

        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            payer: event.payer,
            amount: event.amount,
            raw: event.raw,
            ts: event.ts,
            received_at,
        };

        state.entries.push_front(entry.clone());
        let before = state.entries.len();
        state.entries.truncate(self.capacity);

        if before > state.entries.len() {
            debug!(
                evicted = before - state.entries.len(),
                capacity = self.capacity,
                "Ledger at capacity, evicted oldest entries"
            );
        }

        entry
    }

    /// Sum of amounts for `payer`, matched case-insensitively after trimming.
    pub fn balance_of(&self, payer: &str) -> f64 {
        let key = payer.trim().to_lowercase();
        let state = self.state.read();

        state
            .entries
            .iter()
            .filter(|e| e.is_payer(&key))
            .fold(0.0, |sum, e| sum + e.amount)
    }

    /// Snapshot of retained entries, newest first
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.state.read().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PaymentLedger {
    fn default() -> Self {
        Self::new()
    }
}
