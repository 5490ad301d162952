#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use hollow::rewards::clock::FixedClock;
use hollow::rewards::types::UserId;
use hollow::rewards::{RewardSettings, Rewards};
use hollow::store::SqliteStore;
use std::sync::Arc;

/// An engine over a fresh in-memory store with a settable clock.
pub struct Harness {
    pub rewards: Rewards<SqliteStore>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }
}

/// 2024-03-01 09:00 UTC, the first day of every scenario.
pub fn day_one() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn harness() -> Harness {
    harness_with(RewardSettings::default())
}

pub fn harness_with(settings: RewardSettings) -> Harness {
    let store = SqliteStore::in_memory().unwrap();
    let clock = Arc::new(FixedClock::new(day_one()));
    let rewards = Rewards::new(Arc::new(store), settings).with_clock(clock.clone());
    Harness { rewards, clock }
}

pub fn user(id: &str) -> UserId {
    UserId::parse(id).unwrap()
}
