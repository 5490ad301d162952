//! Achievement tracker: unlock and progress transitions over the static catalog.
//!
//! Unlocking is one-way. The catalog reward is credited exactly once, at the
//! transition, and `date_unlocked` is written only then. Every later unlock or
//! progress call for the same achievement is a no-op that pays nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{self, AchievementDefinition, Category};
use super::error::{Result, RewardsError};
use super::ledger;
use super::locale::Locale;
use super::types::{AchievementState, LedgerCredit, PointsSource, ProgressOutcome, UnlockOutcome};
use crate::store::UserRecords;

/// Progress at or above this value unlocks.
pub const UNLOCK_THRESHOLD: u8 = 100;

/// How a progress update interacts with the stored value while still locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// The latest value replaces the stored one, even if lower.
    #[default]
    LastWriteWins,
    /// The stored value never decreases.
    Monotonic,
}

/// One achievement as shown to a user in a given locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: &'static str,
    pub unlocked: bool,
    pub progress: u8,
    pub category: Category,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_unlocked: Option<DateTime<Utc>>,
}

impl AchievementView {
    fn new(def: &'static AchievementDefinition, state: Option<&AchievementState>, locale: Locale) -> Self {
        let text = def.text(locale);
        Self {
            id: def.id,
            title: text.title,
            description: text.description,
            icon: def.icon,
            condition: text.condition,
            unlocked: state.is_some_and(|s| s.unlocked),
            progress: state.map_or(0, |s| s.progress),
            category: def.category,
            points: def.points,
            date_unlocked: state.and_then(|s| s.date_unlocked),
        }
    }
}

/// Catalog lookup that fails with [`RewardsError::NotFound`].
pub fn definition(achievement_id: &str) -> Result<&'static AchievementDefinition> {
    catalog::find(achievement_id).ok_or_else(|| RewardsError::NotFound(achievement_id.to_string()))
}

/// Validate a caller-supplied progress value: negative is rejected, above 100 clamps.
pub fn normalize_progress(progress: i64) -> Result<u8> {
    if progress < 0 {
        return Err(RewardsError::InvalidInput(format!(
            "progress must be between 0 and 100, got {progress}"
        )));
    }
    Ok(progress.min(i64::from(UNLOCK_THRESHOLD)) as u8)
}

/// Unlock an achievement, crediting its reward if this is the first unlock.
pub fn unlock(
    records: &mut dyn UserRecords,
    achievement_id: &str,
    now: DateTime<Utc>,
    locale: Locale,
) -> Result<UnlockOutcome> {
    let def = definition(achievement_id)?;
    let state = load_state(records, def)?;

    if state.unlocked {
        return Ok(UnlockOutcome {
            success: true,
            points: 0,
        });
    }

    let points = mark_unlocked(records, def, state, now, locale)?;
    Ok(UnlockOutcome {
        success: true,
        points,
    })
}

/// Record progress toward an achievement, unlocking at [`UNLOCK_THRESHOLD`].
pub fn update_progress(
    records: &mut dyn UserRecords,
    achievement_id: &str,
    progress: i64,
    now: DateTime<Utc>,
    locale: Locale,
    policy: ProgressPolicy,
) -> Result<ProgressOutcome> {
    let def = definition(achievement_id)?;
    let progress = normalize_progress(progress)?;
    let mut state = load_state(records, def)?;

    if state.unlocked {
        return Ok(ProgressOutcome {
            success: true,
            unlocked: true,
            points: 0,
        });
    }

    if progress >= UNLOCK_THRESHOLD {
        let points = mark_unlocked(records, def, state, now, locale)?;
        return Ok(ProgressOutcome {
            success: true,
            unlocked: true,
            points,
        });
    }

    state.progress = match policy {
        ProgressPolicy::LastWriteWins => progress,
        ProgressPolicy::Monotonic => state.progress.max(progress),
    };
    records.save_achievement(&state, now)?;
    tracing::debug!(achievement = def.id, progress = state.progress, "achievement progress stored");

    Ok(ProgressOutcome {
        success: true,
        unlocked: false,
        points: 0,
    })
}

/// Every catalog entry in catalog order, merged with the user's stored state.
pub fn views(records: &mut dyn UserRecords, locale: Locale) -> Result<Vec<AchievementView>> {
    let stored = records.achievements()?;
    Ok(catalog::CATALOG
        .iter()
        .map(|def| {
            let state = stored.iter().find(|s| s.achievement_id == def.id);
            AchievementView::new(def, state, locale)
        })
        .collect())
}

fn load_state(records: &mut dyn UserRecords, def: &AchievementDefinition) -> Result<AchievementState> {
    Ok(records
        .achievement(def.id)?
        .unwrap_or_else(|| AchievementState::locked(def.id)))
}

fn mark_unlocked(
    records: &mut dyn UserRecords,
    def: &AchievementDefinition,
    mut state: AchievementState,
    now: DateTime<Utc>,
    locale: Locale,
) -> Result<i64> {
    state.unlocked = true;
    state.progress = UNLOCK_THRESHOLD;
    state.date_unlocked = Some(now);
    records.save_achievement(&state, now)?;

    ledger::add_points(
        records,
        &LedgerCredit {
            amount: def.points,
            source: PointsSource::Achievement,
            source_id: Some(def.id.to_string()),
            description: Some(locale.unlock_description(def.text(locale).title)),
        },
        now,
    )?;

    tracing::info!(achievement = def.id, points = def.points, "achievement unlocked");
    Ok(def.points)
}
