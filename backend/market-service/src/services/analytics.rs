//! Aggregation reporter
//!
//! Derives seller and marketplace statistics from the session store and the
//! content catalog. Revenue figures sum *committed* cost (what close and
//! checkpoint have written onto sessions), never live accrual.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::models::{Amount, UserId};
use crate::services::catalog::ContentCatalog;
use crate::services::sessions::SessionStore;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SellerStats {
    pub total_earnings: Amount,
    pub active_stream_count: usize,
    pub total_product_count: usize,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarketplaceStats {
    pub total_content_count: usize,
    pub active_stream_count: usize,
    pub total_revenue: Amount,
    pub total_creator_count: usize,
}

pub struct StatsReporter {
    sessions: Arc<SessionStore>,
    catalog: Arc<ContentCatalog>,
}

impl StatsReporter {
    pub fn new(sessions: Arc<SessionStore>, catalog: Arc<ContentCatalog>) -> Self {
        Self { sessions, catalog }
    }

    /// Per-seller dashboard numbers.
    ///
    /// Earnings and the active count cover sessions sold by the seller,
    /// active and closed alike; sessions keep counting even if the backing
    /// content was later hard-deleted. The rating average spans all of the
    /// seller's content and is 0.0 for a seller with none.
    pub async fn seller_stats(&self, seller_id: UserId) -> SellerStats {
        let content = self.catalog.by_creator(seller_id).await;

        let mut total_earnings = Amount::ZERO;
        let mut active_stream_count = 0;
        for session in self.sessions.all().await {
            if session.seller_id != seller_id {
                continue;
            }
            total_earnings = total_earnings.saturating_add(session.total_cost);
            if session.is_active {
                active_stream_count += 1;
            }
        }

        let average_rating = if content.is_empty() {
            0.0
        } else {
            content.iter().map(|c| c.rating).sum::<f64>() / content.len() as f64
        };

        SellerStats {
            total_earnings,
            active_stream_count,
            total_product_count: content.len(),
            average_rating,
        }
    }

    /// Marketplace-wide dashboard numbers. Content and creator counts cover
    /// active (non-soft-deleted) content only; a seller whose content is all
    /// inactive is not counted as a creator.
    pub async fn marketplace_stats(&self) -> MarketplaceStats {
        let mut total_content_count = 0;
        let mut creators: HashSet<UserId> = HashSet::new();
        for content in self.catalog.list().await {
            if content.is_active {
                total_content_count += 1;
                creators.insert(content.creator_id);
            }
        }

        let mut total_revenue = Amount::ZERO;
        let mut active_stream_count = 0;
        for session in self.sessions.all().await {
            total_revenue = total_revenue.saturating_add(session.total_cost);
            if session.is_active {
                active_stream_count += 1;
            }
        }

        MarketplaceStats {
            total_content_count,
            active_stream_count,
            total_revenue,
            total_creator_count: creators.len(),
        }
    }
}
