//! SQL DDL for all hollow tables.
//!
//! Defines the `user_points`, `points_history`, `user_achievements` and
//! `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

/// All schema DDL statements for hollow's core tables.
const SCHEMA_SQL: &str = r#"
-- One running total and check-in state per user
CREATE TABLE IF NOT EXISTS user_points (
    user_id TEXT PRIMARY KEY,
    total_points INTEGER NOT NULL DEFAULT 0,
    last_check_in TEXT,
    check_in_streak INTEGER NOT NULL DEFAULT 0 CHECK(check_in_streak >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Append-only points ledger
CREATE TABLE IF NOT EXISTS points_history (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES user_points(user_id),
    amount INTEGER NOT NULL,
    source TEXT NOT NULL CHECK(source IN ('manual','memory','achievement','checkin')),
    source_id TEXT,
    description TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_user ON points_history(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_history_source ON points_history(source);

-- Per-user achievement state; display text lives in the static catalog
CREATE TABLE IF NOT EXISTS user_achievements (
    user_id TEXT NOT NULL,
    achievement_id TEXT NOT NULL,
    unlocked INTEGER NOT NULL DEFAULT 0 CHECK(unlocked IN (0, 1)),
    progress INTEGER NOT NULL DEFAULT 0 CHECK(progress >= 0 AND progress <= 100),
    date_unlocked TEXT,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"user_points".to_string()));
        assert!(tables.contains(&"points_history".to_string()));
        assert!(tables.contains(&"user_achievements".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn progress_is_range_checked() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO user_achievements (user_id, achievement_id, progress, updated_at) \
             VALUES ('u', 'first_confession', 101, '2024-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }
}
