//! Marketplace facade (business logic layer)
//!
//! Wires the catalog, session store, user store, wallet store and ledger
//! behind one object the HTTP layer holds. Settlement here covers the
//! ledger and the users' earnings/spend counters only; wallet balances are
//! deliberately untouched, so a caller that wants balance consistency must
//! reconcile `Transaction` records against `WalletBalance` after the fact.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::models::{Amount, ContentId, SessionId, StreamSession, TransactionKind, UserId};
use crate::services::analytics::StatsReporter;
use crate::services::catalog::{ContentCatalog, ContentLookup};
use crate::services::ledger::TransactionLedger;
use crate::services::sessions::SessionStore;
use crate::services::users::UserStore;
use crate::services::wallet::WalletStore;

pub struct Marketplace {
    catalog: Arc<ContentCatalog>,
    sessions: Arc<SessionStore>,
    users: Arc<UserStore>,
    wallets: Arc<WalletStore>,
    ledger: Arc<TransactionLedger>,
    reporter: StatsReporter,
}

impl Marketplace {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let catalog = Arc::new(ContentCatalog::new(clock.clone()));
        let sessions = Arc::new(SessionStore::new(clock.clone(), catalog.clone()));
        let users = Arc::new(UserStore::new(clock.clone()));
        let wallets = Arc::new(WalletStore::new(clock.clone()));
        let ledger = Arc::new(TransactionLedger::new(clock));
        let reporter = StatsReporter::new(sessions.clone(), catalog.clone());

        Self {
            catalog,
            sessions,
            users,
            wallets,
            ledger,
            reporter,
        }
    }

    pub fn catalog(&self) -> &Arc<ContentCatalog> {
        &self.catalog
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn users(&self) -> &Arc<UserStore> {
        &self.users
    }

    pub fn wallets(&self) -> &Arc<WalletStore> {
        &self.wallets
    }

    pub fn ledger(&self) -> &Arc<TransactionLedger> {
        &self.ledger
    }

    pub fn reporter(&self) -> &StatsReporter {
        &self.reporter
    }

    /// Open a metered session: validates both parties, opens against the
    /// catalog, records the `stream_start` marker and bumps the view count.
    ///
    /// The creator check mirrors the original schema's `creatorId` foreign
    /// key; the catalog itself does not enforce it, so content created with
    /// an unregistered creator can never reach settlement through here.
    pub async fn open_session(
        &self,
        content_id: ContentId,
        buyer_id: UserId,
    ) -> Result<StreamSession> {
        self.users.get(buyer_id).await?;
        let snapshot = self
            .catalog
            .lookup(content_id)
            .await
            .ok_or(MarketError::ContentNotFound(content_id))?;
        self.users.get(snapshot.creator_id).await?;

        let session = self.sessions.open(content_id, buyer_id).await?;
        self.ledger
            .append(session.id, Amount::ZERO, TransactionKind::StreamStart)
            .await;

        if let Err(err) = self.catalog.record_view(content_id).await {
            // content vanished between open and here; the session stands
            warn!(content_id = %content_id, %err, "view count not recorded");
        }

        Ok(session)
    }

    /// Commit accrual-so-far on an active session and settle the newly
    /// committed delta as a `stream_payment`.
    pub async fn record_payment(&self, session_id: SessionId) -> Result<StreamSession> {
        self.verify_parties(session_id).await?;
        let session = self.sessions.checkpoint(session_id).await?;
        self.settle(&session, TransactionKind::StreamPayment).await?;
        Ok(session)
    }

    /// Close a session and settle whatever the final charge adds on top of
    /// earlier payments as a `stream_end`.
    pub async fn close_session(&self, session_id: SessionId) -> Result<StreamSession> {
        self.verify_parties(session_id).await?;
        let session = self.sessions.close(session_id).await?;
        self.settle(&session, TransactionKind::StreamEnd).await?;
        Ok(session)
    }

    /// Both parties must exist before anything commits. Users are never
    /// deleted, so after this check the close/checkpoint and the settlement
    /// below cannot fail halfway and leave the ledger or the earnings/spend
    /// counters asymmetric.
    async fn verify_parties(&self, session_id: SessionId) -> Result<()> {
        let session = self.sessions.get(session_id).await?;
        self.users.get(session.buyer_id).await?;
        self.users.get(session.seller_id).await?;
        Ok(())
    }

    /// Record the gap between the session's committed total and what the
    /// ledger has already seen, and move the buyer/seller counters by it.
    async fn settle(&self, session: &StreamSession, kind: TransactionKind) -> Result<()> {
        let already_recorded = self.ledger.total_for_session(session.id).await;
        let delta = session.total_cost.saturating_sub(already_recorded);
        if delta.is_zero() && kind != TransactionKind::StreamEnd {
            debug!(session_id = %session.id, "nothing new to settle");
            return Ok(());
        }

        self.ledger.append(session.id, delta, kind).await;
        self.users.record_spend(session.buyer_id, delta).await?;
        self.users.record_earnings(session.seller_id, delta).await?;
        Ok(())
    }
}
