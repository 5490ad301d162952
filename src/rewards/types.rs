//! Core record types and operation outcomes.
//!
//! Records ([`PointsAccount`], [`PointsHistoryEntry`], [`AchievementState`]) match the
//! SQLite tables one to one. Outcome structs are what the operations return and what
//! the HTTP layer serializes, hence the camelCase wire names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Result, RewardsError};

/// Opaque caller identity assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Trimmed, non-empty identity or [`RewardsError::Unauthenticated`].
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RewardsError::Unauthenticated);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a ledger entry's points came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsSource {
    #[default]
    Manual,
    Memory,
    Achievement,
    Checkin,
}

impl PointsSource {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Memory => "memory",
            Self::Achievement => "achievement",
            Self::Checkin => "checkin",
        }
    }
}

impl std::fmt::Display for PointsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PointsSource {
    type Err = RewardsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "manual" => Ok(Self::Manual),
            "memory" => Ok(Self::Memory),
            "achievement" => Ok(Self::Achievement),
            "checkin" => Ok(Self::Checkin),
            _ => Err(RewardsError::InvalidInput(format!("unknown points source: {s}"))),
        }
    }
}

/// One user's running total and check-in state, matching the `user_points` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAccount {
    #[serde(skip)]
    pub user_id: String,
    pub total_points: i64,
    /// Instant of the most recent successful check-in.
    pub last_check_in: Option<DateTime<Utc>>,
    /// Consecutive calendar days checked in, ending at `last_check_in`.
    pub check_in_streak: u32,
}

/// One append-only ledger row, matching the `points_history` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistoryEntry {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub amount: i64,
    pub source: PointsSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A ledger credit about to be written.
#[derive(Debug, Clone)]
pub struct LedgerCredit {
    pub amount: i64,
    pub source: PointsSource,
    pub source_id: Option<String>,
    pub description: Option<String>,
}

/// Per-user progress on one achievement, matching the `user_achievements` table.
///
/// A user with no stored row for an achievement reads as [`AchievementState::locked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementState {
    pub achievement_id: String,
    /// One-way: never returns to `false`.
    pub unlocked: bool,
    /// 0–100; always 100 once unlocked.
    pub progress: u8,
    /// Set once, at the unlock transition.
    pub date_unlocked: Option<DateTime<Utc>>,
}

impl AchievementState {
    pub fn locked(achievement_id: &str) -> Self {
        Self {
            achievement_id: achievement_id.to_string(),
            unlocked: false,
            progress: 0,
            date_unlocked: None,
        }
    }
}

/// Result of `add_points`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsOutcome {
    pub success: bool,
    pub total_points: i64,
}

/// Result of a check-in attempt. `success == false` means today was already claimed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    pub success: bool,
    #[serde(rename = "points")]
    pub points_awarded: i64,
    pub streak: u32,
    #[serde(skip)]
    pub already_checked_in_today: bool,
    pub message: String,
    /// Achievements unlocked by this check-in's streak.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlocked: Vec<String>,
}

/// Result of `unlock_achievement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockOutcome {
    pub success: bool,
    pub points: i64,
}

/// Result of `update_achievement_progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressOutcome {
    pub success: bool,
    pub unlocked: bool,
    pub points: i64,
}

/// Comparison of an account's running total against its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAudit {
    pub total_points: i64,
    pub ledger_sum: i64,
    pub consistent: bool,
}
