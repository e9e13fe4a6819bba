//! Demo/smoke entry point for the marketplace core.
//!
//! Seeds the demo marketplace, drives one metered session end to end on a
//! simulated clock and logs the resulting dashboards. The real HTTP surface
//! lives outside this repository and holds a [`Marketplace`] the same way.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use market_service::clock::ManualClock;
use market_service::models::{ContentCategory, ContentId, NewContent, NewUser, UserId, UserRole};
use market_service::services::Marketplace;
use market_service::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,market_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting {} v{} ({})",
        config.app.name,
        env!("CARGO_PKG_VERSION"),
        config.app.env
    );

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let market = Marketplace::new(clock.clone());

    let (buyer, content) = if config.demo.seed_demo_data {
        seed_demo_marketplace(&market).await?
    } else {
        anyhow::bail!("nothing to do without SEED_DEMO_DATA; the core is a library");
    };

    // one full metered session on the simulated clock
    let session = market.open_session(content, buyer).await?;
    info!(session_id = %session.id, "demo session opened");

    clock.advance_secs(config.demo.payment_interval_secs as i64);
    let after_payment = market.record_payment(session.id).await?;
    info!(
        session_id = %session.id,
        committed_minutes = after_payment.total_minutes,
        committed_cost = %after_payment.total_cost,
        "payment checkpoint recorded"
    );

    clock.advance_secs(95);
    let closed = market.close_session(session.id).await?;
    info!(
        session_id = %closed.id,
        total_minutes = closed.total_minutes,
        total_cost = %closed.total_cost,
        "demo session closed"
    );

    let seller_stats = market.reporter().seller_stats(closed.seller_id).await;
    let marketplace_stats = market.reporter().marketplace_stats().await;
    info!(
        "seller stats: {}",
        serde_json::to_string(&seller_stats).context("serializing seller stats")?
    );
    info!(
        "marketplace stats: {}",
        serde_json::to_string(&marketplace_stats).context("serializing marketplace stats")?
    );

    Ok(())
}

/// The original demo dataset: one creator, one buyer, three content items
/// and two funded wallets.
async fn seed_demo_marketplace(market: &Marketplace) -> Result<(UserId, ContentId)> {
    let alice = market
        .users()
        .register(NewUser {
            username: "alice_creator".into(),
            email: "alice@example.com".into(),
            wallet_address: Some("0x742d35Cc6634C0532925a3b8D9F9DC1f3e2f5847".into()),
            role: UserRole::Seller,
        })
        .await?;
    let bob = market
        .users()
        .register(NewUser {
            username: "bob_buyer".into(),
            email: "bob@example.com".into(),
            wallet_address: Some("0x8ba1f109551bD432803012645Hac136c9333E4dF".into()),
            role: UserRole::Buyer,
        })
        .await?;

    market.wallets().set_balance(alice.id, "2".parse()?).await;
    market.wallets().set_balance(bob.id, "1".parse()?).await;

    let catalog = market.catalog();
    let first = catalog
        .create(NewContent {
            title: "Complete JavaScript Mastery".into(),
            description: "Master JavaScript from basics to advanced concepts.".into(),
            category: ContentCategory::Course,
            price_per_minute: "0.01".parse()?,
            duration_minutes: 120,
            thumbnail_url: None,
            content_url: "https://example.com/js-course".into(),
            creator_id: alice.id,
            tags: vec!["javascript".into(), "programming".into()],
        })
        .await;
    catalog
        .create(NewContent {
            title: "Advanced React Patterns".into(),
            description: "Patterns and practices for scalable applications.".into(),
            category: ContentCategory::Course,
            price_per_minute: "0.015".parse()?,
            duration_minutes: 90,
            thumbnail_url: None,
            content_url: "https://example.com/react-course".into(),
            creator_id: alice.id,
            tags: vec!["react".into(), "frontend".into()],
        })
        .await;
    catalog
        .create(NewContent {
            title: "Blockchain Game Development".into(),
            description: "Engaging games with NFT integration.".into(),
            category: ContentCategory::Game,
            price_per_minute: "0.02".parse()?,
            duration_minutes: 180,
            thumbnail_url: None,
            content_url: "https://example.com/blockchain-game".into(),
            creator_id: alice.id,
            tags: vec!["blockchain".into(), "gaming".into()],
        })
        .await;

    info!("demo marketplace seeded");
    Ok((bob.id, first.id))
}
