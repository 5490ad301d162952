//! Supported display locales and the user-facing strings the engine produces.
//!
//! Three locales ship: Chinese (the default), English and Japanese. Unknown
//! codes fall back to Chinese.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Zh,
    En,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Zh, Locale::En, Locale::Ja];

    /// Resolve a locale code such as `en`, `en-US` or `ja_JP`. Never fails.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Self::En,
            "ja" => Self::Ja,
            _ => Self::Zh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Zh => 0,
            Self::En => 1,
            Self::Ja => 2,
        }
    }

    /// Reply shown after a successful check-in.
    pub fn check_in_message(&self, streak: u32, points: i64) -> String {
        match self {
            Self::Zh => format!("连续签到{streak}天，获得{points}积分！"),
            Self::En => format!("Checked in {streak} days in a row, earned {points} points!"),
            Self::Ja => format!("{streak}日連続チェックイン、{points}ポイント獲得！"),
        }
    }

    /// Reply shown when today's check-in already happened.
    pub fn already_checked_in_message(&self) -> &'static str {
        match self {
            Self::Zh => "今日已签到",
            Self::En => "Already Checked in Today",
            Self::Ja => "今日はすでにチェックイン済み",
        }
    }

    /// Ledger description for a check-in award.
    pub fn check_in_description(&self, streak: u32, base: i64, bonus: i64) -> String {
        match self {
            Self::Zh => format!("第{streak}天连续签到 (+{base}基础分,+{bonus}连续签到奖励)"),
            Self::En => format!("Day {streak} check-in (+{base} base, +{bonus} streak bonus)"),
            Self::Ja => format!("{streak}日目の連続チェックイン (+{base}基本, +{bonus}連続ボーナス)"),
        }
    }

    /// Ledger description for an achievement award.
    pub fn unlock_description(&self, title: &str) -> String {
        match self {
            Self::Zh => format!("解锁成就: {title}"),
            Self::En => format!("Achievement unlocked: {title}"),
            Self::Ja => format!("実績解除: {title}"),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
