//! User store
//!
//! Registration and the cumulative earnings/spend counters. Users are never
//! deleted; the counters move only when a session settles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::models::{Amount, NewUser, User, UserId};

struct UserState {
    users: HashMap<UserId, User>,
    next_id: u64,
}

pub struct UserStore {
    state: RwLock<UserState>,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(UserState {
                users: HashMap::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    pub async fn register(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == new.username) {
            return Err(MarketError::DuplicateUsername(new.username));
        }

        let id = UserId(state.next_id);
        state.next_id += 1;

        let user = User {
            id,
            username: new.username,
            email: new.email,
            wallet_address: new.wallet_address,
            role: new.role,
            total_earnings: Amount::ZERO,
            total_spent: Amount::ZERO,
            created_at: self.clock.now(),
        };
        state.users.insert(id, user.clone());

        debug!(user_id = %id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(MarketError::UserNotFound(id))
    }

    pub async fn get_by_username(&self, username: &str) -> Option<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn record_earnings(&self, id: UserId, amount: Amount) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(MarketError::UserNotFound(id))?;
        user.total_earnings = user.total_earnings.saturating_add(amount);
        Ok(user.clone())
    }

    pub async fn record_spend(&self, id: UserId, amount: Amount) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(MarketError::UserNotFound(id))?;
        user.total_spent = user.total_spent.saturating_add(amount);
        Ok(user.clone())
    }
}
