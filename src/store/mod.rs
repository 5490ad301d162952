//! Persistence seam for the rewards engine.
//!
//! The rules in [`crate::rewards`] only ever see a [`UserRecords`] handle, obtained
//! through [`RewardStore::with_user`]. An adapter must run the closure as one atomic
//! unit scoped to that user: either every write made through the handle is durable,
//! or none is. Concurrent units for the same user must not interleave.
//!
//! All methods are synchronous. Callers in async contexts should use
//! `tokio::task::spawn_blocking`.

pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::rewards::error::Result;
use crate::rewards::types::{
    AchievementState, LedgerCredit, PointsAccount, PointsHistoryEntry, UserId,
};

pub use sqlite::SqliteStore;

/// A durable home for points accounts, the points ledger and achievement state.
pub trait RewardStore: Send + Sync + 'static {
    /// Run `f` against one user's records as a single transaction.
    ///
    /// If `f` returns `Err`, nothing it wrote is kept.
    fn with_user<R, F>(&self, user: &UserId, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn UserRecords) -> Result<R>;
}

/// One user's records, valid for the duration of a [`RewardStore::with_user`] call.
pub trait UserRecords {
    /// The user's account, created with zero totals if it does not exist yet.
    fn account(&mut self) -> Result<PointsAccount>;

    /// Add `credit.amount` to the running total and append the ledger row.
    /// Returns the new total.
    fn credit(&mut self, credit: &LedgerCredit, at: DateTime<Utc>) -> Result<i64>;

    /// Record a successful check-in.
    fn set_check_in(&mut self, at: DateTime<Utc>, streak: u32) -> Result<()>;

    /// Most recent ledger rows first.
    fn history(&mut self, limit: usize) -> Result<Vec<PointsHistoryEntry>>;

    /// Sum of every ledger amount for the user.
    fn ledger_sum(&mut self) -> Result<i64>;

    /// Stored state for one achievement, or `None` if never touched.
    fn achievement(&mut self, achievement_id: &str) -> Result<Option<AchievementState>>;

    /// Every stored achievement row for the user.
    fn achievements(&mut self) -> Result<Vec<AchievementState>>;

    /// Insert or replace one achievement row.
    fn save_achievement(&mut self, state: &AchievementState, at: DateTime<Utc>) -> Result<()>;
}
