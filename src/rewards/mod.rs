//! Points, check-in and achievement rules engine.
//!
//! [`Rewards`] is the async entry point. Each operation validates its input, then
//! runs one [`RewardStore::with_user`] transaction on the blocking pool, so every
//! rule sees and writes a consistent snapshot of the user's records.

pub mod achievements;
pub mod catalog;
pub mod checkin;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod locale;
pub mod triggers;
pub mod types;

use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;

use crate::store::{RewardStore, UserRecords};
use achievements::{AchievementView, ProgressPolicy};
use clock::{Clock, SystemClock};
use error::{Result, RewardsError};
use locale::Locale;
use triggers::{AppliedMilestone, JournalActivity, JournalEntry};
use types::{
    AddPointsOutcome, CheckInOutcome, LedgerAudit, LedgerCredit, PointsAccount,
    PointsHistoryEntry, PointsSource, ProgressOutcome, UnlockOutcome, UserId,
};

/// Engine-wide policy, resolved from the `[rewards]` config section.
#[derive(Debug, Clone)]
pub struct RewardSettings {
    /// Locale for text produced without a caller locale (unlock ledger descriptions).
    pub default_locale: Locale,
    /// Reference offset for calendar-day comparisons.
    pub utc_offset: FixedOffset,
    pub progress_policy: ProgressPolicy,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            utc_offset: Utc.fix(),
            progress_policy: ProgressPolicy::default(),
        }
    }
}

pub struct Rewards<S: RewardStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    settings: Arc<RewardSettings>,
}

impl<S: RewardStore> Clone for Rewards<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: RewardStore> Rewards<S> {
    pub fn new(store: Arc<S>, settings: RewardSettings) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            settings: Arc::new(settings),
        }
    }

    /// Replace the wall clock, e.g. with a [`clock::FixedClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &RewardSettings {
        &self.settings
    }

    /// Run `f` as one store transaction for `user` on the blocking pool.
    async fn run<R, F>(&self, user: &UserId, op: &'static str, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn UserRecords) -> Result<R> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let user = user.clone();
        let span = tracing::info_span!("rewards", op, user = %user);

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            store.with_user(&user, f)
        })
        .await
        .map_err(|e| RewardsError::Internal(format!("rewards task failed: {e}")))?
    }

    /// The user's total, last check-in and streak. Creates the account if needed.
    ///
    /// A streak whose last check-in is older than yesterday reads as 0.
    pub async fn get_points(&self, user: &UserId) -> Result<PointsAccount> {
        let offset = self.settings.utc_offset;
        let today = clock::calendar_date(self.clock.now(), offset);

        let mut account = self.run(user, "get_points", |r| r.account()).await?;
        account.check_in_streak = checkin::effective_streak(&account, today, offset);
        Ok(account)
    }

    pub async fn add_points(
        &self,
        user: &UserId,
        amount: i64,
        source: PointsSource,
        source_id: Option<String>,
        description: Option<String>,
    ) -> Result<AddPointsOutcome> {
        let now = self.clock.now();
        let credit = LedgerCredit {
            amount,
            source,
            source_id,
            description,
        };
        let total_points = self
            .run(user, "add_points", move |r| ledger::add_points(r, &credit, now))
            .await?;
        Ok(AddPointsOutcome {
            success: true,
            total_points,
        })
    }

    /// Claim today's check-in. An already-claimed day is `success: false`, not an error.
    pub async fn check_in(&self, user: &UserId, locale: Option<Locale>) -> Result<CheckInOutcome> {
        let now = self.clock.now();
        let locale = locale.unwrap_or(self.settings.default_locale);
        let offset = self.settings.utc_offset;
        let policy = self.settings.progress_policy;

        self.run(user, "check_in", move |r| {
            let mut outcome = checkin::check_in(r, now, offset, locale)?;
            if outcome.success {
                if let Some(milestone) = triggers::check_in_milestone(outcome.streak) {
                    let applied = triggers::apply(r, &[milestone], now, locale, policy)?;
                    outcome.unlocked = applied
                        .into_iter()
                        .filter(|a| a.points > 0)
                        .map(|a| a.achievement_id.to_string())
                        .collect();
                }
            }
            Ok(outcome)
        })
        .await
    }

    pub async fn get_achievements(&self, user: &UserId, locale: Locale) -> Result<Vec<AchievementView>> {
        self.run(user, "get_achievements", move |r| achievements::views(r, locale))
            .await
    }

    pub async fn unlock_achievement(&self, user: &UserId, achievement_id: &str) -> Result<UnlockOutcome> {
        let def = achievements::definition(achievement_id)?;
        let now = self.clock.now();
        let locale = self.settings.default_locale;

        self.run(user, "unlock_achievement", move |r| {
            achievements::unlock(r, def.id, now, locale)
        })
        .await
    }

    pub async fn update_achievement_progress(
        &self,
        user: &UserId,
        achievement_id: &str,
        progress: i64,
    ) -> Result<ProgressOutcome> {
        let def = achievements::definition(achievement_id)?;
        achievements::normalize_progress(progress)?;
        let now = self.clock.now();
        let locale = self.settings.default_locale;
        let policy = self.settings.progress_policy;

        self.run(user, "update_achievement_progress", move |r| {
            achievements::update_progress(r, def.id, progress, now, locale, policy)
        })
        .await
    }

    /// Re-evaluate journal-driven achievements from the user's full entry list.
    pub async fn record_journal_activity(
        &self,
        user: &UserId,
        entries: &[JournalEntry],
    ) -> Result<Vec<AppliedMilestone>> {
        let now = self.clock.now();
        let today = clock::calendar_date(now, self.settings.utc_offset);
        let activity = JournalActivity::from_entries(entries, today, self.settings.utc_offset);
        let milestones = triggers::journal_milestones(&activity);
        if milestones.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(entries = activity.entries, words = activity.words, "journal activity");
        let locale = self.settings.default_locale;
        let policy = self.settings.progress_policy;

        self.run(user, "record_journal_activity", move |r| {
            triggers::apply(r, &milestones, now, locale, policy)
        })
        .await
    }

    /// Most recent ledger entries first.
    pub async fn history(&self, user: &UserId, limit: Option<usize>) -> Result<Vec<PointsHistoryEntry>> {
        let limit = ledger::validate_history_limit(limit)?;
        self.run(user, "history", move |r| r.history(limit)).await
    }

    pub async fn verify_ledger(&self, user: &UserId) -> Result<LedgerAudit> {
        self.run(user, "verify_ledger", |r| ledger::audit(r)).await
    }
}
