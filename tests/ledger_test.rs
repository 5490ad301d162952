mod helpers;

use chrono::Duration;
use helpers::{harness, user};
use hollow::rewards::error::RewardsError;
use hollow::rewards::types::PointsSource;

#[tokio::test]
async fn total_matches_ledger_after_mixed_credits() {
    let h = harness();
    let u = user("alice");

    for (amount, source) in [
        (12, PointsSource::Manual),
        (3, PointsSource::Memory),
        (-4, PointsSource::Manual),
        (25, PointsSource::Memory),
    ] {
        h.rewards
            .add_points(&u, amount, source, None, Some("test credit".into()))
            .await
            .unwrap();
    }
    h.rewards.check_in(&u, None).await.unwrap();

    let audit = h.rewards.verify_ledger(&u).await.unwrap();
    assert!(audit.consistent);
    assert_eq!(audit.total_points, 12 + 3 - 4 + 25 + 5);
    assert_eq!(audit.ledger_sum, audit.total_points);
}

#[tokio::test]
async fn add_points_returns_the_new_total() {
    let h = harness();
    let u = user("bob");

    let first = h
        .rewards
        .add_points(&u, 7, PointsSource::Manual, None, None)
        .await
        .unwrap();
    let second = h
        .rewards
        .add_points(&u, 8, PointsSource::Memory, Some("mem-1".into()), None)
        .await
        .unwrap();

    assert!(first.success && second.success);
    assert_eq!(first.total_points, 7);
    assert_eq!(second.total_points, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_credits_lose_no_updates() {
    let h = harness();
    let u = user("carol");

    let mut tasks = Vec::new();
    for i in 1..=50i64 {
        let rewards = h.rewards.clone();
        let u = u.clone();
        tasks.push(tokio::spawn(async move {
            rewards
                .add_points(&u, i, PointsSource::Manual, None, None)
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let audit = h.rewards.verify_ledger(&u).await.unwrap();
    assert_eq!(audit.total_points, (1..=50).sum::<i64>());
    assert!(audit.consistent);
    assert_eq!(h.rewards.history(&u, Some(500)).await.unwrap().len(), 50);
}

#[tokio::test]
async fn history_is_newest_first_and_limited() {
    let h = harness();
    let u = user("dave");

    for amount in 1..=5 {
        h.rewards
            .add_points(&u, amount, PointsSource::Manual, None, None)
            .await
            .unwrap();
        h.clock.advance(Duration::minutes(1));
    }

    let latest = h.rewards.history(&u, Some(3)).await.unwrap();
    let amounts: Vec<i64> = latest.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![5, 4, 3]);

    // Ties on created_at fall back to insertion order.
    h.rewards
        .add_points(&u, 100, PointsSource::Manual, None, None)
        .await
        .unwrap();
    h.rewards
        .add_points(&u, 200, PointsSource::Manual, None, None)
        .await
        .unwrap();
    let latest = h.rewards.history(&u, Some(2)).await.unwrap();
    assert_eq!(latest[0].amount, 200);
    assert_eq!(latest[1].amount, 100);
}

#[tokio::test]
async fn history_limit_out_of_range_is_invalid() {
    let h = harness();
    let u = user("erin");

    for limit in [0, 501] {
        let err = h.rewards.history(&u, Some(limit)).await.unwrap_err();
        assert!(matches!(err, RewardsError::InvalidInput(_)), "limit {limit}");
    }
    assert!(h.rewards.history(&u, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn users_do_not_share_balances() {
    let h = harness();
    let a = user("frank");
    let b = user("grace");

    h.rewards
        .add_points(&a, 40, PointsSource::Manual, None, None)
        .await
        .unwrap();
    h.rewards.check_in(&b, None).await.unwrap();

    assert_eq!(h.rewards.get_points(&a).await.unwrap().total_points, 40);
    assert_eq!(h.rewards.get_points(&b).await.unwrap().total_points, 5);
    assert!(h.rewards.get_points(&a).await.unwrap().last_check_in.is_none());
}
