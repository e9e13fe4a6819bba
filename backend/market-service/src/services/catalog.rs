//! Content catalog
//!
//! In-memory store for sellable content items. Deleting is a soft operation
//! (`is_active = false`); `remove` exists for hard deletion but sessions keep
//! billing against the price they captured at open either way.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::models::{Amount, Content, ContentId, ContentUpdate, NewContent, UserId};

/// Read-only lookup capability the session store consumes. Kept narrow on
/// purpose: opening a session needs the active flag, the current price and
/// the creator, nothing else.
#[async_trait]
pub trait ContentLookup: Send + Sync {
    async fn lookup(&self, id: ContentId) -> Option<ContentSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSnapshot {
    pub is_active: bool,
    pub price_per_minute: Amount,
    pub creator_id: UserId,
    pub rating: f64,
}

struct CatalogState {
    items: HashMap<ContentId, Content>,
    next_id: u64,
}

pub struct ContentCatalog {
    state: RwLock<CatalogState>,
    clock: Arc<dyn Clock>,
}

impl ContentCatalog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                items: HashMap::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    pub async fn create(&self, new: NewContent) -> Content {
        let mut state = self.state.write().await;
        let id = ContentId(state.next_id);
        state.next_id += 1;

        let content = Content {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            price_per_minute: new.price_per_minute,
            duration_minutes: new.duration_minutes,
            thumbnail_url: new.thumbnail_url,
            content_url: new.content_url,
            creator_id: new.creator_id,
            tags: new.tags,
            is_active: true,
            rating: 0.0,
            total_views: 0,
            created_at: self.clock.now(),
        };
        state.items.insert(id, content.clone());

        debug!(content_id = %id, creator_id = %content.creator_id, "content created");
        content
    }

    pub async fn get(&self, id: ContentId) -> Result<Content> {
        self.state
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or(MarketError::ContentNotFound(id))
    }

    pub async fn list(&self) -> Vec<Content> {
        self.state.read().await.items.values().cloned().collect()
    }

    pub async fn by_creator(&self, creator_id: UserId) -> Vec<Content> {
        self.state
            .read()
            .await
            .items
            .values()
            .filter(|c| c.creator_id == creator_id)
            .cloned()
            .collect()
    }

    /// Apply a partial update. Price changes do not affect sessions already
    /// open against the old price.
    pub async fn update(&self, id: ContentId, update: ContentUpdate) -> Result<Content> {
        let mut state = self.state.write().await;
        let content = state
            .items
            .get_mut(&id)
            .ok_or(MarketError::ContentNotFound(id))?;

        if let Some(title) = update.title {
            content.title = title;
        }
        if let Some(description) = update.description {
            content.description = description;
        }
        if let Some(price) = update.price_per_minute {
            content.price_per_minute = price;
        }
        if let Some(is_active) = update.is_active {
            content.is_active = is_active;
        }
        if let Some(tags) = update.tags {
            content.tags = tags;
        }
        if let Some(rating) = update.rating {
            content.rating = rating.clamp(0.0, 5.0);
        }

        Ok(content.clone())
    }

    /// Soft delete: the item stays listed for its owner but cannot open new
    /// sessions and drops out of marketplace totals.
    pub async fn deactivate(&self, id: ContentId) -> Result<Content> {
        self.update(
            id,
            ContentUpdate {
                is_active: Some(false),
                ..ContentUpdate::default()
            },
        )
        .await
    }

    /// Hard delete. Existing sessions keep their captured price and ids.
    pub async fn remove(&self, id: ContentId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(MarketError::ContentNotFound(id))
    }

    pub async fn record_view(&self, id: ContentId) -> Result<u64> {
        let mut state = self.state.write().await;
        let content = state
            .items
            .get_mut(&id)
            .ok_or(MarketError::ContentNotFound(id))?;
        content.total_views += 1;
        Ok(content.total_views)
    }
}

#[async_trait]
impl ContentLookup for ContentCatalog {
    async fn lookup(&self, id: ContentId) -> Option<ContentSnapshot> {
        self.state.read().await.items.get(&id).map(|c| ContentSnapshot {
            is_active: c.is_active,
            price_per_minute: c.price_per_minute,
            creator_id: c.creator_id,
            rating: c.rating,
        })
    }
}
