//! Wallet balances
//!
//! Per-user scalar balances, mutable independently of session accrual. The
//! core does not reconcile these against the ledger; a caller that wants
//! balance/ledger consistency performs that reconciliation after settlement.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::models::{Amount, UserId, WalletBalance};

pub struct WalletStore {
    balances: RwLock<HashMap<UserId, WalletBalance>>,
    clock: Arc<dyn Clock>,
}

impl WalletStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn balance_of(&self, user_id: UserId) -> Result<WalletBalance> {
        self.balances
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(MarketError::WalletNotFound(user_id))
    }

    /// Upsert the balance outright, as the original PUT endpoint did.
    pub async fn set_balance(&self, user_id: UserId, balance: Amount) -> WalletBalance {
        let wallet = WalletBalance {
            user_id,
            balance,
            updated_at: self.clock.now(),
        };
        self.balances.write().await.insert(user_id, wallet.clone());
        wallet
    }

    /// Add to the balance, starting from zero for an unknown wallet.
    pub async fn credit(&self, user_id: UserId, amount: Amount) -> WalletBalance {
        let mut balances = self.balances.write().await;
        let now = self.clock.now();
        let wallet = balances.entry(user_id).or_insert(WalletBalance {
            user_id,
            balance: Amount::ZERO,
            updated_at: now,
        });
        wallet.balance = wallet.balance.saturating_add(amount);
        wallet.updated_at = now;
        wallet.clone()
    }

    /// Subtract from the balance. Fails on a missing wallet or overdraft.
    pub async fn debit(&self, user_id: UserId, amount: Amount) -> Result<WalletBalance> {
        let mut balances = self.balances.write().await;
        let wallet = balances
            .get_mut(&user_id)
            .ok_or(MarketError::WalletNotFound(user_id))?;
        wallet.balance = wallet.balance.checked_sub(amount).ok_or_else(|| {
            MarketError::InvalidAmount(format!(
                "debit {amount} exceeds balance {}",
                wallet.balance
            ))
        })?;
        wallet.updated_at = self.clock.now();
        Ok(wallet.clone())
    }
}
