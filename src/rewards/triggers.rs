//! Derived achievement milestones.
//!
//! Journal-driven achievements are recomputed from a snapshot of the user's journal
//! entries; the check-in streak drives `seven_day_checkin`. A milestone at 100
//! unlocks, anything lower is a progress update. Applying the same milestones twice
//! never pays twice.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::achievements::{self, ProgressPolicy, UNLOCK_THRESHOLD};
use super::catalog::{
    EMOTIONAL_GROWTH, FIRST_CONFESSION, POSITIVE_EMOTION, SEVEN_DAY_CHECKIN, TEN_CONFESSIONS,
    THOUSAND_WORDS, THREE_DAY_STREAK, VOICE_DIARY,
};
use super::clock::calendar_date;
use super::error::Result;
use super::locale::Locale;
use crate::store::UserRecords;

const TEN_CONFESSIONS_TARGET: usize = 10;
const THOUSAND_WORDS_TARGET: usize = 1000;
const POSITIVE_EMOTION_TARGET: usize = 5;
const VOICE_DIARY_TARGET: usize = 20;
const JOURNAL_STREAK_TARGET: u32 = 3;
const CHECK_IN_STREAK_TARGET: u32 = 7;

const POSITIVE_SCORE: f64 = 80.0;
const LOW_SCORE: f64 = 30.0;
const HIGH_SCORE: f64 = 70.0;

/// Summary of one saved journal entry, as supplied by the journal service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub content: String,
    #[serde(default)]
    pub emotion_score: Option<f64>,
    #[serde(default)]
    pub has_audio: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts over every journal entry a user has saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalActivity {
    pub entries: usize,
    pub words: usize,
    /// Entries with an emotion score above 80.
    pub positive: usize,
    pub voice: usize,
    /// A score below 30 was later followed by one above 70.
    pub emotional_growth: bool,
    /// Consecutive journaling days ending today or yesterday.
    pub streak_days: u32,
}

impl JournalActivity {
    pub fn from_entries(entries: &[JournalEntry], today: NaiveDate, offset: FixedOffset) -> Self {
        let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.created_at);

        let mut seen_low = false;
        let mut emotional_growth = false;
        for score in ordered.iter().filter_map(|e| e.emotion_score) {
            if score < LOW_SCORE {
                seen_low = true;
            } else if seen_low && score > HIGH_SCORE {
                emotional_growth = true;
                break;
            }
        }

        let days: BTreeSet<NaiveDate> = entries
            .iter()
            .map(|e| calendar_date(e.created_at, offset))
            .collect();

        Self {
            entries: entries.len(),
            words: entries.iter().map(|e| e.content.split_whitespace().count()).sum(),
            positive: entries
                .iter()
                .filter(|e| e.emotion_score.is_some_and(|s| s > POSITIVE_SCORE))
                .count(),
            voice: entries.iter().filter(|e| e.has_audio).count(),
            emotional_growth,
            streak_days: trailing_streak(&days, today),
        }
    }
}

fn trailing_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Target progress for one achievement; 100 means unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub achievement_id: &'static str,
    pub progress: u8,
}

impl Milestone {
    fn unlock(achievement_id: &'static str) -> Self {
        Self {
            achievement_id,
            progress: UNLOCK_THRESHOLD,
        }
    }

    /// `count / target` as a percentage, or unlock once the target is reached.
    fn toward(achievement_id: &'static str, count: usize, target: usize) -> Self {
        if count >= target {
            return Self::unlock(achievement_id);
        }
        Self {
            achievement_id,
            progress: (count * 100 / target) as u8,
        }
    }
}

/// Milestones implied by a journal snapshot. Empty when there are no entries.
pub fn journal_milestones(activity: &JournalActivity) -> Vec<Milestone> {
    if activity.entries == 0 {
        return Vec::new();
    }

    let mut out = vec![
        Milestone::unlock(FIRST_CONFESSION),
        Milestone::toward(TEN_CONFESSIONS, activity.entries, TEN_CONFESSIONS_TARGET),
        Milestone::toward(THOUSAND_WORDS, activity.words, THOUSAND_WORDS_TARGET),
    ];
    if activity.positive > 0 {
        out.push(Milestone::toward(POSITIVE_EMOTION, activity.positive, POSITIVE_EMOTION_TARGET));
    }
    if activity.voice > 0 {
        out.push(Milestone::toward(VOICE_DIARY, activity.voice, VOICE_DIARY_TARGET));
    }
    if activity.emotional_growth {
        out.push(Milestone::unlock(EMOTIONAL_GROWTH));
    }
    if activity.streak_days > 0 {
        out.push(Milestone::toward(
            THREE_DAY_STREAK,
            activity.streak_days as usize,
            JOURNAL_STREAK_TARGET as usize,
        ));
    }
    out
}

/// Milestone implied by a check-in streak.
pub fn check_in_milestone(streak: u32) -> Option<Milestone> {
    (streak > 0).then(|| {
        Milestone::toward(SEVEN_DAY_CHECKIN, streak as usize, CHECK_IN_STREAK_TARGET as usize)
    })
}

/// What applying one milestone did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedMilestone {
    pub achievement_id: &'static str,
    pub progress: u8,
    pub unlocked: bool,
    /// Points paid by this application; 0 if it was already unlocked.
    pub points: i64,
}

/// Apply milestones in order through the achievement tracker.
pub fn apply(
    records: &mut dyn UserRecords,
    milestones: &[Milestone],
    now: DateTime<Utc>,
    locale: Locale,
    policy: ProgressPolicy,
) -> Result<Vec<AppliedMilestone>> {
    let mut applied = Vec::with_capacity(milestones.len());
    for m in milestones {
        let (unlocked, points) = if m.progress >= UNLOCK_THRESHOLD {
            let outcome = achievements::unlock(records, m.achievement_id, now, locale)?;
            (true, outcome.points)
        } else {
            let outcome = achievements::update_progress(
                records,
                m.achievement_id,
                i64::from(m.progress),
                now,
                locale,
                policy,
            )?;
            (outcome.unlocked, outcome.points)
        };
        applied.push(AppliedMilestone {
            achievement_id: m.achievement_id,
            progress: m.progress,
            unlocked,
            points,
        });
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap()
    }

    fn entry(content: &str, score: Option<f64>, audio: bool, days_ago: i64) -> JournalEntry {
        JournalEntry {
            content: content.into(),
            emotion_score: score,
            has_audio: audio,
            created_at: base() - Duration::days(days_ago),
        }
    }

    fn find(ms: &[Milestone], id: &str) -> Option<u8> {
        ms.iter().find(|m| m.achievement_id == id).map(|m| m.progress)
    }

    #[test]
    fn no_entries_no_milestones() {
        let activity = JournalActivity::from_entries(&[], base().date_naive(), utc());
        assert!(journal_milestones(&activity).is_empty());
    }

    #[test]
    fn counts_and_formulas() {
        let entries: Vec<_> = (0..4)
            .map(|i| entry("one two three", Some(90.0), i % 2 == 0, 0))
            .collect();
        let activity = JournalActivity::from_entries(&entries, base().date_naive(), utc());
        assert_eq!(activity.words, 12);
        assert_eq!(activity.positive, 4);
        assert_eq!(activity.voice, 2);

        let ms = journal_milestones(&activity);
        assert_eq!(find(&ms, FIRST_CONFESSION), Some(100));
        assert_eq!(find(&ms, TEN_CONFESSIONS), Some(40));
        assert_eq!(find(&ms, THOUSAND_WORDS), Some(1));
        assert_eq!(find(&ms, POSITIVE_EMOTION), Some(80));
        assert_eq!(find(&ms, VOICE_DIARY), Some(10));
        assert_eq!(find(&ms, EMOTIONAL_GROWTH), None);
    }

    #[test]
    fn thresholds_unlock() {
        let long = "word ".repeat(100);
        let entries: Vec<_> = (0..20).map(|_| entry(&long, Some(85.0), true, 0)).collect();
        let activity = JournalActivity::from_entries(&entries, base().date_naive(), utc());
        let ms = journal_milestones(&activity);
        for id in [TEN_CONFESSIONS, THOUSAND_WORDS, POSITIVE_EMOTION, VOICE_DIARY] {
            assert_eq!(find(&ms, id), Some(100), "{id}");
        }
    }

    #[test]
    fn emotional_growth_needs_low_before_high() {
        let rising = [entry("a", Some(20.0), false, 3), entry("b", Some(75.0), false, 1)];
        let falling = [entry("a", Some(75.0), false, 3), entry("b", Some(20.0), false, 1)];
        let today = base().date_naive();
        assert!(JournalActivity::from_entries(&rising, today, utc()).emotional_growth);
        assert!(!JournalActivity::from_entries(&falling, today, utc()).emotional_growth);
    }

    #[test]
    fn journal_streak_ends_today_or_yesterday() {
        let today = base().date_naive();
        let run = [entry("a", None, false, 1), entry("b", None, false, 2), entry("c", None, false, 3)];
        assert_eq!(JournalActivity::from_entries(&run, today, utc()).streak_days, 3);

        let stale = [entry("a", None, false, 2), entry("b", None, false, 3)];
        assert_eq!(JournalActivity::from_entries(&stale, today, utc()).streak_days, 0);
    }

    #[test]
    fn check_in_streak_drives_seven_day() {
        assert_eq!(check_in_milestone(0), None);
        assert_eq!(check_in_milestone(1).unwrap().progress, 14);
        assert_eq!(check_in_milestone(6).unwrap().progress, 85);
        assert_eq!(check_in_milestone(7).unwrap().progress, 100);
        assert_eq!(check_in_milestone(40).unwrap().progress, 100);
    }
}
