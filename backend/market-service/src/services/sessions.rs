//! Stream session store
//!
//! Lifecycle of metered sessions: open, checkpoint, close, plus the derived
//! queries the dashboard layer reads. A single `RwLock` over the session map
//! serializes open/close/read per the low-contention concurrency model, so
//! two concurrent closes of the same session cannot both succeed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::models::{Amount, ContentId, SessionId, StreamSession, UserId};
use crate::services::billing;
use crate::services::catalog::ContentLookup;

struct SessionState {
    sessions: HashMap<SessionId, StreamSession>,
    next_id: u64,
}

pub struct SessionStore {
    state: RwLock<SessionState>,
    clock: Arc<dyn Clock>,
    content: Arc<dyn ContentLookup>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, content: Arc<dyn ContentLookup>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                sessions: HashMap::new(),
                next_id: 1,
            }),
            clock,
            content,
        }
    }

    /// Open a metered session against active content.
    ///
    /// The content's current price-per-minute is captured into the session
    /// here and governs billing for the session's whole lifetime; later
    /// catalog price changes do not apply. Session ids are monotonically
    /// increasing and never reused.
    pub async fn open(&self, content_id: ContentId, buyer_id: UserId) -> Result<StreamSession> {
        let snapshot = self
            .content
            .lookup(content_id)
            .await
            .ok_or(MarketError::ContentNotFound(content_id))?;
        if !snapshot.is_active {
            return Err(MarketError::ContentInactive(content_id));
        }

        let mut state = self.state.write().await;
        let id = SessionId(state.next_id);
        state.next_id += 1;

        let now = self.clock.now();
        let session = StreamSession {
            id,
            content_id,
            buyer_id,
            seller_id: snapshot.creator_id,
            price_per_minute: snapshot.price_per_minute,
            started_at: now,
            ended_at: None,
            total_minutes: 0,
            total_cost: Amount::ZERO,
            is_active: true,
            created_at: now,
        };
        state.sessions.insert(id, session.clone());

        info!(
            session_id = %id,
            content_id = %content_id,
            buyer_id = %buyer_id,
            price_per_minute = %session.price_per_minute,
            "session opened"
        );
        Ok(session)
    }

    /// Close a session, committing its final charge.
    ///
    /// This is the exactly-once commit point: performed under the write
    /// lock, so of two racing closes one wins and the other observes
    /// `SessionAlreadyClosed`. The failure is deliberate, not a silent
    /// no-op, and never recomputes a new cost.
    pub async fn close(&self, session_id: SessionId) -> Result<StreamSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(MarketError::SessionNotFound(session_id))?;
        if !session.is_active {
            return Err(MarketError::SessionAlreadyClosed(session_id));
        }

        let now = self.clock.now();
        let quote = billing::quote(session.started_at, now, session.price_per_minute)?;
        session.total_minutes = quote.minutes;
        session.total_cost = quote.cost;
        session.ended_at = Some(now);
        session.is_active = false;

        info!(
            session_id = %session_id,
            total_minutes = session.total_minutes,
            total_cost = %session.total_cost,
            "session closed"
        );
        Ok(session.clone())
    }

    /// Commit the accrual-so-far onto a still-active session.
    ///
    /// Totals only move forward; a quote smaller than what is already
    /// committed leaves the session untouched.
    pub async fn checkpoint(&self, session_id: SessionId) -> Result<StreamSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(MarketError::SessionNotFound(session_id))?;
        if !session.is_active {
            return Err(MarketError::SessionAlreadyClosed(session_id));
        }

        let quote = billing::quote(session.started_at, self.clock.now(), session.price_per_minute)?;
        if quote.minutes > session.total_minutes {
            session.total_minutes = quote.minutes;
            session.total_cost = quote.cost;
            debug!(
                session_id = %session_id,
                total_minutes = session.total_minutes,
                total_cost = %session.total_cost,
                "session checkpoint committed"
            );
        }
        Ok(session.clone())
    }

    pub async fn get(&self, session_id: SessionId) -> Result<StreamSession> {
        self.state
            .read()
            .await
            .sessions
            .get(&session_id)
            .cloned()
            .ok_or(MarketError::SessionNotFound(session_id))
    }

    /// Active sessions in which the user participates as buyer or seller.
    /// Iteration order is unspecified (HashMap-backed); callers must not
    /// assume insertion order.
    pub async fn active_sessions_for(&self, user_id: UserId) -> Vec<StreamSession> {
        self.state
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.is_active && (s.buyer_id == user_id || s.seller_id == user_id))
            .cloned()
            .collect()
    }

    /// All sessions, active or closed, referencing a content item.
    pub async fn sessions_for_content(&self, content_id: ContentId) -> Vec<StreamSession> {
        self.state
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.content_id == content_id)
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<StreamSession> {
        self.state.read().await.sessions.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{ContentCategory, NewContent};
    use crate::services::catalog::ContentCatalog;
    use chrono::Utc;

    async fn fixture() -> (Arc<ManualClock>, Arc<ContentCatalog>, SessionStore, ContentId) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let catalog = Arc::new(ContentCatalog::new(clock.clone()));
        let content = catalog
            .create(NewContent {
                title: "Advanced React Patterns".into(),
                description: "Scalable frontends".into(),
                category: ContentCategory::Course,
                price_per_minute: "0.05".parse().unwrap(),
                duration_minutes: 90,
                thumbnail_url: None,
                content_url: "https://example.com/react".into(),
                creator_id: UserId(1),
                tags: vec![],
            })
            .await;
        let store = SessionStore::new(clock.clone(), catalog.clone());
        (clock, catalog, store, content.id)
    }

    #[tokio::test]
    async fn open_captures_price_and_seller() {
        let (_clock, _catalog, store, content_id) = fixture().await;
        let session = store.open(content_id, UserId(2)).await.unwrap();

        assert!(session.is_active);
        assert_eq!(session.seller_id, UserId(1));
        assert_eq!(session.price_per_minute, "0.05".parse().unwrap());
        assert_eq!(session.total_cost, Amount::ZERO);
        assert!(session.ended_at.is_none());
    }

    #[tokio::test]
    async fn open_unknown_or_inactive_content_fails() {
        let (_clock, catalog, store, content_id) = fixture().await;

        let err = store.open(ContentId(999), UserId(2)).await.unwrap_err();
        assert_eq!(err, MarketError::ContentNotFound(ContentId(999)));

        catalog.deactivate(content_id).await.unwrap();
        let err = store.open(content_id, UserId(2)).await.unwrap_err();
        assert_eq!(err, MarketError::ContentInactive(content_id));
    }

    #[tokio::test]
    async fn close_commits_floor_of_elapsed_minutes() {
        let (clock, _catalog, store, content_id) = fixture().await;
        let session = store.open(content_id, UserId(2)).await.unwrap();

        clock.advance_secs(185);
        let closed = store.close(session.id).await.unwrap();

        assert!(!closed.is_active);
        assert_eq!(closed.total_minutes, 3);
        assert_eq!(closed.total_cost, "0.15".parse().unwrap());
        assert_eq!(closed.ended_at, Some(clock.now()));
    }

    #[tokio::test]
    async fn second_close_fails_and_totals_stay_frozen() {
        let (clock, _catalog, store, content_id) = fixture().await;
        let session = store.open(content_id, UserId(2)).await.unwrap();

        clock.advance_secs(120);
        let closed = store.close(session.id).await.unwrap();

        clock.advance_secs(600);
        let err = store.close(session.id).await.unwrap_err();
        assert_eq!(err, MarketError::SessionAlreadyClosed(session.id));

        let read_back = store.get(session.id).await.unwrap();
        assert_eq!(read_back.total_minutes, closed.total_minutes);
        assert_eq!(read_back.total_cost, closed.total_cost);
        assert_eq!(read_back.ended_at, closed.ended_at);
    }

    #[tokio::test]
    async fn checkpoint_only_moves_forward() {
        let (clock, _catalog, store, content_id) = fixture().await;
        let session = store.open(content_id, UserId(2)).await.unwrap();

        clock.advance_secs(150);
        let first = store.checkpoint(session.id).await.unwrap();
        assert_eq!(first.total_minutes, 2);
        assert_eq!(first.total_cost, "0.10".parse().unwrap());
        assert!(first.is_active);

        // between whole minutes nothing new commits
        clock.advance_secs(20);
        let second = store.checkpoint(session.id).await.unwrap();
        assert_eq!(second.total_minutes, 2);
        assert_eq!(second.total_cost, first.total_cost);
    }

    #[tokio::test]
    async fn captured_price_survives_catalog_price_change() {
        let (clock, catalog, store, content_id) = fixture().await;
        let session = store.open(content_id, UserId(2)).await.unwrap();

        catalog
            .update(
                content_id,
                crate::models::ContentUpdate {
                    price_per_minute: Some("9.99".parse().unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        clock.advance_secs(60);
        let closed = store.close(session.id).await.unwrap();
        assert_eq!(closed.total_cost, "0.05".parse().unwrap());
    }

    #[tokio::test]
    async fn active_sessions_filter_by_participant() {
        let (_clock, _catalog, store, content_id) = fixture().await;
        let s1 = store.open(content_id, UserId(2)).await.unwrap();
        store.open(content_id, UserId(3)).await.unwrap();

        store.close(s1.id).await.unwrap();

        // buyer 2 has no active sessions left; buyer 3 has one; the seller
        // (user 1) sees every active session on their content
        assert!(store.active_sessions_for(UserId(2)).await.is_empty());
        assert_eq!(store.active_sessions_for(UserId(3)).await.len(), 1);
        assert_eq!(store.active_sessions_for(UserId(1)).await.len(), 1);
        assert_eq!(store.sessions_for_content(content_id).await.len(), 2);
    }
}
