//! Shared fixtures for the integration tests.

use std::sync::Arc;

use chrono::Utc;
use market_service::clock::ManualClock;
use market_service::models::{
    Content, ContentCategory, NewContent, NewUser, User, UserId, UserRole,
};
use market_service::services::Marketplace;

pub struct TestMarket {
    pub clock: Arc<ManualClock>,
    pub market: Marketplace,
    pub alice: User,
    pub bob: User,
    pub course: Content,
}

/// One seller with one priced course, one buyer, and a clock that only
/// moves when the test says so.
pub async fn test_market() -> TestMarket {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let market = Marketplace::new(clock.clone());

    let alice = market
        .users()
        .register(NewUser {
            username: "alice_creator".into(),
            email: "alice@example.com".into(),
            wallet_address: None,
            role: UserRole::Seller,
        })
        .await
        .expect("register seller");
    let bob = market
        .users()
        .register(NewUser {
            username: "bob_buyer".into(),
            email: "bob@example.com".into(),
            wallet_address: None,
            role: UserRole::Buyer,
        })
        .await
        .expect("register buyer");

    let course = market
        .catalog()
        .create(new_content(alice.id, "0.05", "Complete JavaScript Mastery"))
        .await;

    TestMarket {
        clock,
        market,
        alice,
        bob,
        course,
    }
}

pub fn new_content(creator: UserId, price: &str, title: &str) -> NewContent {
    NewContent {
        title: title.into(),
        description: "integration fixture".into(),
        category: ContentCategory::Course,
        price_per_minute: price.parse().expect("valid price"),
        duration_minutes: 120,
        thumbnail_url: None,
        content_url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        creator_id: creator,
        tags: vec![],
    }
}
