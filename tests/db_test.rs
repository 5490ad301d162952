use hollow::db;
use hollow::rewards::types::PointsSource;
use hollow::rewards::{RewardSettings, Rewards};
use hollow::store::SqliteStore;
use std::sync::Arc;

#[test]
fn open_database_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rewards.db");

    let conn = db::open_database(&path).unwrap();
    assert!(path.exists());

    let version = db::migrations::get_schema_version(&conn).unwrap();
    assert_eq!(version, db::migrations::CURRENT_SCHEMA_VERSION);

    let timeout: i64 = conn
        .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);

    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewards.db");
    let u = hollow::rewards::types::UserId::parse("alice").unwrap();

    {
        let store = SqliteStore::open(&path).unwrap();
        let rewards = Rewards::new(Arc::new(store), RewardSettings::default());
        rewards
            .add_points(&u, 42, PointsSource::Manual, None, None)
            .await
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let rewards = Rewards::new(Arc::new(store), RewardSettings::default());
    assert_eq!(rewards.get_points(&u).await.unwrap().total_points, 42);
    assert_eq!(rewards.history(&u, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn ledger_rows_cannot_be_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewards.db");
    let u = hollow::rewards::types::UserId::parse("bob").unwrap();

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let rewards = Rewards::new(Arc::clone(&store), RewardSettings::default());
    rewards
        .add_points(&u, 10, PointsSource::Manual, None, None)
        .await
        .unwrap();

    let (update, delete) = store
        .with_connection(|conn| {
            (
                conn.execute("UPDATE points_history SET amount = 1000", []),
                conn.execute("DELETE FROM points_history", []),
            )
        })
        .unwrap();
    assert!(update.is_err());
    assert!(delete.is_err());

    assert!(rewards.verify_ledger(&u).await.unwrap().consistent);
}

#[test]
fn health_report_counts_rows_and_drift() {
    let conn = db::open_memory_database().unwrap();
    conn.execute(
        "INSERT INTO user_points (user_id, total_points, check_in_streak, created_at, updated_at) \
         VALUES ('drifted', 99, 0, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.account_count, 1);
    assert_eq!(report.history_count, 0);
    assert_eq!(report.drifted_accounts, 1);
}
