use crate::support::test_market;
use market_service::models::TransactionKind;
use market_service::MarketError;

#[tokio::test]
async fn metered_session_end_to_end() {
    let t = test_market().await;

    let session = t
        .market
        .open_session(t.course.id, t.bob.id)
        .await
        .expect("open");
    assert!(session.is_active);
    assert_eq!(session.seller_id, t.alice.id);

    // 150s in: two whole minutes at 0.05
    t.clock.advance_secs(150);
    let paid = t.market.record_payment(session.id).await.expect("payment");
    assert_eq!(paid.total_minutes, 2);
    assert_eq!(paid.total_cost, "0.10".parse().unwrap());
    assert!(paid.is_active);

    // close at 185s: floor applies at close, not continuously
    t.clock.advance_secs(35);
    let closed = t.market.close_session(session.id).await.expect("close");
    assert!(!closed.is_active);
    assert_eq!(closed.total_minutes, 3);
    assert_eq!(closed.total_cost, "0.15".parse().unwrap());
    assert!(closed.ended_at.is_some());

    // ledger: start marker, the 0.10 payment, the 0.05 remainder
    let entries = t.market.ledger().for_session(session.id).await;
    let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::StreamStart,
            TransactionKind::StreamPayment,
            TransactionKind::StreamEnd,
        ]
    );
    assert_eq!(
        t.market.ledger().total_for_session(session.id).await,
        closed.total_cost
    );

    // earnings/spend move with settlement
    let alice = t.market.users().get(t.alice.id).await.unwrap();
    let bob = t.market.users().get(t.bob.id).await.unwrap();
    assert_eq!(alice.total_earnings, closed.total_cost);
    assert_eq!(bob.total_spent, closed.total_cost);
}

#[tokio::test]
async fn closed_session_is_frozen_and_close_is_not_repeatable() {
    let t = test_market().await;
    let session = t.market.open_session(t.course.id, t.bob.id).await.unwrap();

    t.clock.advance_secs(185);
    let closed = t.market.close_session(session.id).await.unwrap();

    // much later, a retry must fail loudly and change nothing
    t.clock.advance_secs(3_600);
    let err = t.market.close_session(session.id).await.unwrap_err();
    assert_eq!(err, MarketError::SessionAlreadyClosed(session.id));

    let read_back = t.market.sessions().get(session.id).await.unwrap();
    assert_eq!(read_back.total_minutes, closed.total_minutes);
    assert_eq!(read_back.total_cost, closed.total_cost);
    assert_eq!(read_back.ended_at, closed.ended_at);

    let err = t.market.record_payment(session.id).await.unwrap_err();
    assert_eq!(err, MarketError::SessionAlreadyClosed(session.id));
}

#[tokio::test]
async fn inactive_content_rejects_new_sessions_but_keeps_running_ones() {
    let t = test_market().await;
    let session = t.market.open_session(t.course.id, t.bob.id).await.unwrap();

    t.market.catalog().deactivate(t.course.id).await.unwrap();

    let err = t.market.open_session(t.course.id, t.bob.id).await.unwrap_err();
    assert_eq!(err, MarketError::ContentInactive(t.course.id));

    // the running session still bills at its captured price
    t.clock.advance_secs(60);
    let closed = t.market.close_session(session.id).await.unwrap();
    assert_eq!(closed.total_cost, "0.05".parse().unwrap());
}
