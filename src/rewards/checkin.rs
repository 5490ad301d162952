//! Daily check-in tracker.
//!
//! A check-in is accepted once per calendar day in the reference offset. The streak
//! continues only when the previous check-in fell on the day before; any larger gap
//! restarts it at 1. The award is a fixed base plus one tier bonus keyed on the new
//! streak.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

use super::clock::calendar_date;
use super::error::Result;
use super::ledger;
use super::locale::Locale;
use super::types::{CheckInOutcome, LedgerCredit, PointsAccount, PointsSource};
use crate::store::UserRecords;

pub const BASE_POINTS: i64 = 5;

/// Tier bonus for a streak; tiers replace one another rather than stack.
pub fn streak_bonus(streak: u32) -> i64 {
    match streak {
        30.. => 15,
        15.. => 10,
        7.. => 5,
        3.. => 2,
        _ => 0,
    }
}

/// Total points for a check-in that produces `streak`.
pub fn points_for_streak(streak: u32) -> i64 {
    BASE_POINTS + streak_bonus(streak)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStep {
    /// Today is already claimed.
    AlreadyCheckedIn,
    /// Accept the check-in with this new streak.
    Advance(u32),
}

/// Decide what a check-in on `today` does, given the previous check-in's date.
///
/// A previous date after `today` means the clock moved backwards; it is treated
/// as already claimed so the day cannot be paid twice.
pub fn next_streak(last: Option<NaiveDate>, streak: u32, today: NaiveDate) -> StreakStep {
    let Some(last) = last else {
        return StreakStep::Advance(1);
    };
    if last >= today {
        return StreakStep::AlreadyCheckedIn;
    }
    let yesterday = today.checked_sub_days(Days::new(1));
    if Some(last) == yesterday {
        StreakStep::Advance(streak.saturating_add(1))
    } else {
        StreakStep::Advance(1)
    }
}

/// The streak as seen on `today`: 0 once the last check-in is older than yesterday.
///
/// The stored counter is only rewritten by the next check-in, so every read that
/// leaves the engine goes through this.
pub fn effective_streak(account: &PointsAccount, today: NaiveDate, offset: FixedOffset) -> u32 {
    let Some(last) = account.last_check_in.map(|at| calendar_date(at, offset)) else {
        return 0;
    };
    match today.checked_sub_days(Days::new(1)) {
        Some(yesterday) if last < yesterday => 0,
        _ => account.check_in_streak,
    }
}

/// Run one check-in against the user's records.
pub fn check_in(
    records: &mut dyn UserRecords,
    now: DateTime<Utc>,
    offset: FixedOffset,
    locale: Locale,
) -> Result<CheckInOutcome> {
    let account = records.account()?;
    let today = calendar_date(now, offset);
    let last = account.last_check_in.map(|at| calendar_date(at, offset));

    let streak = match next_streak(last, account.check_in_streak, today) {
        StreakStep::AlreadyCheckedIn => {
            tracing::debug!(streak = account.check_in_streak, "already checked in today");
            return Ok(CheckInOutcome {
                success: false,
                points_awarded: 0,
                streak: account.check_in_streak,
                already_checked_in_today: true,
                message: locale.already_checked_in_message().to_string(),
                unlocked: Vec::new(),
            });
        }
        StreakStep::Advance(streak) => streak,
    };

    let bonus = streak_bonus(streak);
    let awarded = BASE_POINTS + bonus;

    records.set_check_in(now, streak)?;
    ledger::add_points(
        records,
        &LedgerCredit {
            amount: awarded,
            source: PointsSource::Checkin,
            source_id: None,
            description: Some(locale.check_in_description(streak, BASE_POINTS, bonus)),
        },
        now,
    )?;

    tracing::info!(streak, awarded, %today, "check-in accepted");

    Ok(CheckInOutcome {
        success: true,
        points_awarded: awarded,
        streak,
        already_checked_in_today: false,
        message: locale.check_in_message(streak, awarded),
        unlocked: Vec::new(),
    })
}
