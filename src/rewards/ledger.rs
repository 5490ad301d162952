//! Points ledger: running totals backed by an append-only history.

use chrono::{DateTime, Utc};

use super::error::{Result, RewardsError};
use super::types::{LedgerAudit, LedgerCredit};
use crate::store::UserRecords;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 500;

/// Credit `credit.amount` to the account and append the matching ledger row.
///
/// Amounts are not sign-checked; nothing in the engine spends points.
pub fn add_points(
    records: &mut dyn UserRecords,
    credit: &LedgerCredit,
    at: DateTime<Utc>,
) -> Result<i64> {
    let total = records.credit(credit, at)?;
    tracing::info!(
        amount = credit.amount,
        source = %credit.source,
        source_id = credit.source_id.as_deref().unwrap_or(""),
        total,
        "points credited"
    );
    Ok(total)
}

pub fn validate_history_limit(limit: Option<usize>) -> Result<usize> {
    match limit {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(n) if (1..=MAX_HISTORY_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(RewardsError::InvalidInput(format!(
            "history limit must be between 1 and {MAX_HISTORY_LIMIT}, got {n}"
        ))),
    }
}

/// Compare the running total with the sum of the ledger.
pub fn audit(records: &mut dyn UserRecords) -> Result<LedgerAudit> {
    let total_points = records.account()?.total_points;
    let ledger_sum = records.ledger_sum()?;
    if total_points != ledger_sum {
        tracing::warn!(total_points, ledger_sum, "ledger drift detected");
    }
    Ok(LedgerAudit {
        total_points,
        ledger_sum,
        consistent: total_points == ledger_sum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::types::{PointsSource, UserId};
    use crate::store::{RewardStore, SqliteStore};

    fn credit(amount: i64, source: PointsSource) -> LedgerCredit {
        LedgerCredit {
            amount,
            source,
            source_id: None,
            description: None,
        }
    }

    #[test]
    fn total_tracks_ledger_sum() {
        let store = SqliteStore::in_memory().unwrap();
        let user = UserId::parse("u1").unwrap();
        let now = Utc::now();

        for (amount, source) in [
            (10, PointsSource::Achievement),
            (5, PointsSource::Checkin),
            (3, PointsSource::Manual),
            (-2, PointsSource::Manual),
        ] {
            store
                .with_user(&user, |r| add_points(r, &credit(amount, source), now))
                .unwrap();
            let report = store.with_user(&user, |r| audit(r)).unwrap();
            assert!(report.consistent);
        }

        let report = store.with_user(&user, |r| audit(r)).unwrap();
        assert_eq!(report.total_points, 16);
        assert_eq!(report.ledger_sum, 16);
    }

    #[test]
    fn history_limit_bounds() {
        assert_eq!(validate_history_limit(None).unwrap(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(validate_history_limit(Some(1)).unwrap(), 1);
        assert!(validate_history_limit(Some(0)).is_err());
        assert!(validate_history_limit(Some(MAX_HISTORY_LIMIT + 1)).is_err());
    }
}
