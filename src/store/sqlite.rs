//! SQLite adapter for [`RewardStore`].
//!
//! Every [`RewardStore::with_user`] call takes the connection lock and opens a
//! `BEGIN IMMEDIATE` transaction, so read-modify-write on a user's counters is
//! serialized within the process and, through SQLite's write lock, across
//! processes sharing the file. Totals are only ever changed with
//! `total_points = total_points + ?` in the same transaction as the ledger insert.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;

use super::{RewardStore, UserRecords};
use crate::rewards::error::{Result, RewardsError};
use crate::rewards::types::{
    AchievementState, LedgerCredit, PointsAccount, PointsHistoryEntry, PointsSource, UserId,
};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap a connection that already has the schema applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the database file, applying schema and migrations.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_database(path)?))
    }

    /// A migrated in-memory store.
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_memory_database()?))
    }

    /// Run `f` against the raw connection, outside any user transaction.
    pub fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> R) -> Result<R> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RewardsError::Internal(format!("db lock poisoned: {e}")))?;
        Ok(f(&conn))
    }
}

impl RewardStore for SqliteStore {
    fn with_user<R, F>(&self, user: &UserId, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn UserRecords) -> Result<R>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RewardsError::Internal(format!("db lock poisoned: {e}")))?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut records = SqliteUserRecords {
            conn: &tx,
            user_id: user.as_str(),
        };
        // Dropping `tx` on the error path rolls back.
        let out = f(&mut records)?;

        tx.commit()?;
        Ok(out)
    }
}

struct SqliteUserRecords<'a> {
    conn: &'a Connection,
    user_id: &'a str,
}

impl SqliteUserRecords<'_> {
    fn ensure_account(&self) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO user_points (user_id, total_points, check_in_streak, created_at, updated_at) \
             VALUES (?1, 0, 0, ?2, ?2)",
            params![self.user_id, now],
        )?;
        Ok(())
    }
}

impl UserRecords for SqliteUserRecords<'_> {
    fn account(&mut self) -> Result<PointsAccount> {
        self.ensure_account()?;

        let (total_points, last_check_in, streak): (i64, Option<String>, i64) = self.conn.query_row(
            "SELECT total_points, last_check_in, check_in_streak FROM user_points WHERE user_id = ?1",
            params![self.user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(PointsAccount {
            user_id: self.user_id.to_string(),
            total_points,
            last_check_in: last_check_in.as_deref().map(parse_timestamp).transpose()?,
            check_in_streak: u32::try_from(streak)
                .map_err(|_| RewardsError::Corrupt(format!("negative streak for {}", self.user_id)))?,
        })
    }

    fn credit(&mut self, credit: &LedgerCredit, at: DateTime<Utc>) -> Result<i64> {
        self.ensure_account()?;
        let at = at.to_rfc3339();

        let total: i64 = self.conn.query_row(
            "UPDATE user_points SET total_points = total_points + ?1, updated_at = ?2 \
             WHERE user_id = ?3 RETURNING total_points",
            params![credit.amount, at, self.user_id],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO points_history (id, user_id, amount, source, source_id, description, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                uuid::Uuid::now_v7().to_string(),
                self.user_id,
                credit.amount,
                credit.source.as_str(),
                credit.source_id,
                credit.description,
                at,
            ],
        )?;

        Ok(total)
    }

    fn set_check_in(&mut self, at: DateTime<Utc>, streak: u32) -> Result<()> {
        self.ensure_account()?;
        let at = at.to_rfc3339();
        self.conn.execute(
            "UPDATE user_points SET last_check_in = ?1, check_in_streak = ?2, updated_at = ?1 \
             WHERE user_id = ?3",
            params![at, streak, self.user_id],
        )?;
        Ok(())
    }

    fn history(&mut self, limit: usize) -> Result<Vec<PointsHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, source, source_id, description, created_at FROM points_history \
             WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![self.user_id, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, amount, source, source_id, description, created_at)| {
                Ok(PointsHistoryEntry {
                    id,
                    amount,
                    source: source
                        .parse::<PointsSource>()
                        .map_err(|_| RewardsError::Corrupt(format!("unknown ledger source: {source}")))?,
                    source_id,
                    description,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    fn ledger_sum(&mut self) -> Result<i64> {
        let sum: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM points_history WHERE user_id = ?1",
            params![self.user_id],
            |row| row.get(0),
        )?;
        Ok(sum)
    }

    fn achievement(&mut self, achievement_id: &str) -> Result<Option<AchievementState>> {
        let row: Option<(bool, i64, Option<String>)> = self
            .conn
            .query_row(
                "SELECT unlocked, progress, date_unlocked FROM user_achievements \
                 WHERE user_id = ?1 AND achievement_id = ?2",
                params![self.user_id, achievement_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(unlocked, progress, date_unlocked)| {
            decode_achievement(achievement_id.to_string(), unlocked, progress, date_unlocked)
        })
        .transpose()
    }

    fn achievements(&mut self) -> Result<Vec<AchievementState>> {
        let mut stmt = self.conn.prepare(
            "SELECT achievement_id, unlocked, progress, date_unlocked FROM user_achievements \
             WHERE user_id = ?1",
        )?;

        let rows = stmt
            .query_map(params![self.user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, unlocked, progress, date_unlocked)| {
                decode_achievement(id, unlocked, progress, date_unlocked)
            })
            .collect()
    }

    fn save_achievement(&mut self, state: &AchievementState, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_achievements (user_id, achievement_id, unlocked, progress, date_unlocked, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(user_id, achievement_id) DO UPDATE SET \
               unlocked = excluded.unlocked, \
               progress = excluded.progress, \
               date_unlocked = excluded.date_unlocked, \
               updated_at = excluded.updated_at",
            params![
                self.user_id,
                state.achievement_id,
                state.unlocked,
                state.progress,
                state.date_unlocked.map(|d| d.to_rfc3339()),
                at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

fn decode_achievement(
    achievement_id: String,
    unlocked: bool,
    progress: i64,
    date_unlocked: Option<String>,
) -> Result<AchievementState> {
    let progress = u8::try_from(progress)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| RewardsError::Corrupt(format!("progress {progress} out of range for {achievement_id}")))?;

    Ok(AchievementState {
        date_unlocked: date_unlocked.as_deref().map(parse_timestamp).transpose()?,
        achievement_id,
        unlocked,
        progress,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RewardsError::Corrupt(format!("invalid timestamp {raw:?}: {e}")))
}
