//! Transaction ledger
//!
//! Append-only record of payment events tied to stream sessions. Entries
//! reference a session by id but do not own it; nothing here is ever
//! updated or deleted.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::models::{Amount, SessionId, Transaction, TransactionKind, TxId};

struct LedgerState {
    entries: Vec<Transaction>,
    next_id: u64,
}

pub struct TransactionLedger {
    state: RwLock<LedgerState>,
    clock: Arc<dyn Clock>,
}

impl TransactionLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                entries: Vec::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    pub async fn append(
        &self,
        session_id: SessionId,
        amount: Amount,
        kind: TransactionKind,
    ) -> Transaction {
        let mut state = self.state.write().await;
        let id = TxId(state.next_id);
        state.next_id += 1;

        let tx = Transaction {
            id,
            session_id,
            amount,
            kind,
            timestamp: self.clock.now(),
        };
        state.entries.push(tx.clone());

        debug!(tx_id = %id, session_id = %session_id, amount = %amount, ?kind, "ledger entry appended");
        tx
    }

    /// Entries for one session, in append order.
    pub async fn for_session(&self, session_id: SessionId) -> Vec<Transaction> {
        self.state
            .read()
            .await
            .entries
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Sum of everything recorded against a session so far. Settlement uses
    /// this to turn a session's committed total into a payment delta.
    pub async fn total_for_session(&self, session_id: SessionId) -> Amount {
        self.state
            .read()
            .await
            .entries
            .iter()
            .filter(|t| t.session_id == session_id)
            .fold(Amount::ZERO, |acc, t| acc.saturating_add(t.amount))
    }

    pub async fn all(&self) -> Vec<Transaction> {
        self.state.read().await.entries.clone()
    }
}
