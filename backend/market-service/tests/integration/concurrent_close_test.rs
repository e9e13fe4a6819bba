use crate::support::test_market;
use market_service::MarketError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_closes_have_exactly_one_winner() {
    let t = test_market().await;
    let session = t.market.open_session(t.course.id, t.bob.id).await.unwrap();
    t.clock.advance_secs(120);

    let store = t.market.sessions().clone();
    let a = tokio::spawn({
        let store = store.clone();
        async move { store.close(session.id).await }
    });
    let b = tokio::spawn(async move { store.close(session.id).await });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one close must succeed");

    let loser = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("one close must fail");
    assert_eq!(*loser, MarketError::SessionAlreadyClosed(session.id));

    let winner = results
        .iter()
        .find_map(|r| r.as_ref().ok())
        .expect("one close must succeed");
    assert_eq!(winner.total_minutes, 2);
}
