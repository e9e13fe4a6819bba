//! Data model for the StreamMall marketplace core
//!
//! One canonical identity scheme is used throughout: typed numeric ids
//! allocated monotonically by each store, never reused. Wallet addresses are
//! plain user attributes, not keys.

mod amount;

pub use amount::{Amount, ParseAmountError, AMOUNT_SCALE};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId
);
entity_id!(
    /// Identifier of a sellable content item.
    ContentId
);
entity_id!(
    /// Identifier of a metered stream session.
    SessionId
);
entity_id!(
    /// Identifier of a ledger transaction.
    TxId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Course,
    Game,
    Document,
    Design,
}

/// A registered marketplace user.
///
/// `total_earnings` and `total_spent` are mutated only by session close and
/// payment recording; users are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub wallet_address: Option<String>,
    pub role: UserRole,
    pub total_earnings: Amount,
    pub total_spent: Amount,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied on registration; the store fills in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub wallet_address: Option<String>,
    pub role: UserRole,
}

/// A sellable content item, billed per streamed minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub category: ContentCategory,
    pub price_per_minute: Amount,
    /// Total playable duration cap, in minutes. Enforcing it is a caller
    /// policy; the core only stores it.
    pub duration_minutes: u32,
    pub thumbnail_url: Option<String>,
    pub content_url: String,
    pub creator_id: UserId,
    pub tags: Vec<String>,
    /// Soft-delete flag. Inactive content cannot open new sessions.
    pub is_active: bool,
    pub rating: f64,
    pub total_views: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied on content creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContent {
    pub title: String,
    pub description: String,
    pub category: ContentCategory,
    pub price_per_minute: Amount,
    pub duration_minutes: u32,
    pub thumbnail_url: Option<String>,
    pub content_url: String,
    pub creator_id: UserId,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update applied to an existing content item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_per_minute: Option<Amount>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
}

/// A single metered access period linking one buyer to one content item.
///
/// `price_per_minute` is captured from the content at open time and governs
/// billing for the session's entire lifetime, even if the catalog price
/// changes later. `ended_at` is set if and only if `is_active` is false;
/// `total_minutes` and `total_cost` only grow while active and are frozen
/// after close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSession {
    pub id: SessionId,
    pub content_id: ContentId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub price_per_minute: Amount,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_minutes: u64,
    pub total_cost: Amount,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    StreamStart,
    StreamPayment,
    StreamEnd,
}

/// An immutable ledger entry recording one payment event for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub session_id: SessionId,
    pub amount: Amount,
    pub kind: TransactionKind,
    pub timestamp: DateTime<Utc>,
}

/// A per-user scalar balance. Independently mutable; not transactionally
/// consistent with session cost accrual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBalance {
    pub user_id: UserId,
    pub balance: Amount,
    pub updated_at: DateTime<Utc>,
}
