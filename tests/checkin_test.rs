mod helpers;

use chrono::Duration;
use helpers::{harness, user};
use hollow::rewards::catalog::SEVEN_DAY_CHECKIN;
use hollow::rewards::locale::Locale;

#[tokio::test]
async fn new_user_scenario() {
    let h = harness();
    let u = user("alice");

    let account = h.rewards.get_points(&u).await.unwrap();
    assert_eq!(account.total_points, 0);
    assert_eq!(account.check_in_streak, 0);
    assert!(account.last_check_in.is_none());

    let day1 = h.rewards.check_in(&u, None).await.unwrap();
    assert!(day1.success);
    assert_eq!(day1.points_awarded, 5);
    assert_eq!(day1.streak, 1);

    let again = h.rewards.check_in(&u, None).await.unwrap();
    assert!(!again.success);
    assert_eq!(again.streak, 1);
    assert_eq!(again.points_awarded, 0);

    h.advance_days(1);
    let day2 = h.rewards.check_in(&u, None).await.unwrap();
    assert!(day2.success);
    assert_eq!(day2.points_awarded, 5);
    assert_eq!(day2.streak, 2);

    h.advance_days(3);
    let day5 = h.rewards.check_in(&u, None).await.unwrap();
    assert!(day5.success);
    assert_eq!(day5.points_awarded, 5);
    assert_eq!(day5.streak, 1);

    let account = h.rewards.get_points(&u).await.unwrap();
    assert_eq!(account.total_points, 15);
    assert!(h.rewards.verify_ledger(&u).await.unwrap().consistent);
}

#[tokio::test]
async fn lapsed_streak_reads_as_zero_until_next_check_in() {
    let h = harness();
    let u = user("zoe");

    h.rewards.check_in(&u, None).await.unwrap();
    h.advance_days(1);
    h.rewards.check_in(&u, None).await.unwrap();

    h.advance_days(1);
    assert_eq!(h.rewards.get_points(&u).await.unwrap().check_in_streak, 2);

    h.advance_days(4);
    let account = h.rewards.get_points(&u).await.unwrap();
    assert_eq!(account.check_in_streak, 0);
    assert!(account.last_check_in.is_some());
    assert_eq!(account.total_points, 10);

    let next = h.rewards.check_in(&u, None).await.unwrap();
    assert_eq!(next.streak, 1);
    assert_eq!(h.rewards.get_points(&u).await.unwrap().check_in_streak, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_check_ins_pay_once() {
    let h = harness();
    let u = user("yuki");

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let rewards = h.rewards.clone();
        let u = u.clone();
        tasks.push(tokio::spawn(async move { rewards.check_in(&u, None).await }));
    }

    let mut accepted = 0;
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.streak, 1);
        if outcome.success {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);

    let audit = h.rewards.verify_ledger(&u).await.unwrap();
    assert_eq!(audit.total_points, 5);
    assert!(audit.consistent);
    assert_eq!(h.rewards.history(&u, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_check_in_same_day_changes_nothing() {
    let h = harness();
    let u = user("bob");

    h.rewards.check_in(&u, None).await.unwrap();
    let before = h.rewards.get_points(&u).await.unwrap();

    h.clock.advance(Duration::hours(10));
    let again = h.rewards.check_in(&u, Some(Locale::En)).await.unwrap();
    let after = h.rewards.get_points(&u).await.unwrap();

    assert!(!again.success);
    assert!(again.already_checked_in_today);
    assert_eq!(again.message, "Already Checked in Today");
    assert_eq!(before, after);
}

#[tokio::test]
async fn streak_bonus_table_over_thirty_days() {
    let h = harness();
    let u = user("carol");

    for day in 1..=31u32 {
        let outcome = h.rewards.check_in(&u, None).await.unwrap();
        assert!(outcome.success, "day {day}");
        assert_eq!(outcome.streak, day);
        let expected = match day {
            1..=2 => 5,
            3..=6 => 7,
            7..=14 => 10,
            15..=29 => 15,
            _ => 20,
        };
        assert_eq!(outcome.points_awarded, expected, "day {day}");
        h.advance_days(1);
    }

    assert!(h.rewards.verify_ledger(&u).await.unwrap().consistent);
}

#[tokio::test]
async fn seventh_consecutive_day_unlocks_seven_day_checkin() {
    let h = harness();
    let u = user("dave");

    for _ in 0..6 {
        let outcome = h.rewards.check_in(&u, None).await.unwrap();
        assert!(outcome.unlocked.is_empty());
        h.advance_days(1);
    }
    let before = h.rewards.get_points(&u).await.unwrap().total_points;

    let seventh = h.rewards.check_in(&u, None).await.unwrap();
    assert_eq!(seventh.streak, 7);
    assert_eq!(seventh.unlocked, vec![SEVEN_DAY_CHECKIN.to_string()]);

    let after = h.rewards.get_points(&u).await.unwrap().total_points;
    assert_eq!(after - before, 10 + 70);

    // Longer streaks never pay the achievement again.
    h.advance_days(1);
    let eighth = h.rewards.check_in(&u, None).await.unwrap();
    assert!(eighth.unlocked.is_empty());
}

#[tokio::test]
async fn check_in_message_follows_requested_locale() {
    let h = harness();
    let u = user("erin");

    let outcome = h.rewards.check_in(&u, Some(Locale::Ja)).await.unwrap();
    assert!(outcome.message.contains("チェックイン"));

    let history = h.rewards.history(&u, Some(1)).await.unwrap();
    assert_eq!(
        history[0].description.as_deref(),
        Some("1日目の連続チェックイン (+5基本, +0連続ボーナス)")
    );
}
