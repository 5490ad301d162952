//! The fixed achievement catalog.
//!
//! Definitions are locale-independent except for their display text, which is
//! stored per [`Locale`] and resolved at read time. Per-user rows only ever hold
//! unlock state and progress.

use serde::Serialize;

use super::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Interaction,
    Emotion,
    Streak,
    Special,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::Emotion => "emotion",
            Self::Streak => "streak",
            Self::Special => "special",
        }
    }
}

#[derive(Debug)]
pub struct LocalizedText {
    pub title: &'static str,
    pub description: &'static str,
    pub condition: &'static str,
}

#[derive(Debug)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub category: Category,
    pub points: i64,
    pub icon: &'static str,
    /// Indexed by [`Locale::index`]: zh, en, ja.
    text: [LocalizedText; 3],
}

impl AchievementDefinition {
    pub fn text(&self, locale: Locale) -> &LocalizedText {
        &self.text[locale.index()]
    }
}

pub const FIRST_CONFESSION: &str = "first_confession";
pub const THREE_DAY_STREAK: &str = "three_day_streak";
pub const TEN_CONFESSIONS: &str = "ten_confessions";
pub const THOUSAND_WORDS: &str = "thousand_words";
pub const SEVEN_DAY_CHECKIN: &str = "seven_day_checkin";
pub const POSITIVE_EMOTION: &str = "positive_emotion";
pub const EMOTIONAL_GROWTH: &str = "emotional_growth";
pub const VOICE_DIARY: &str = "voice_diary";

const fn text(
    title: &'static str,
    description: &'static str,
    condition: &'static str,
) -> LocalizedText {
    LocalizedText {
        title,
        description,
        condition,
    }
}

pub static CATALOG: [AchievementDefinition; 8] = [
    AchievementDefinition {
        id: FIRST_CONFESSION,
        category: Category::Interaction,
        points: 10,
        icon: "🌱",
        text: [
            text("初次相遇", "第一次与树洞对话", "进行第一次树洞对话"),
            text(
                "First Encounter",
                "First conversation with the tree hollow",
                "Have your first tree hollow conversation",
            ),
            text(
                "初めての出会い",
                "木のくぼみとの最初の会話",
                "木のくぼみとの最初の会話を完了する",
            ),
        ],
    },
    AchievementDefinition {
        id: THREE_DAY_STREAK,
        category: Category::Streak,
        points: 30,
        icon: "🌿",
        text: [
            text("持续倾诉", "连续3天分享心情", "连续3天使用树洞"),
            text(
                "Continuous Sharing",
                "Share your feelings for 3 consecutive days",
                "Use the tree hollow for 3 consecutive days",
            ),
            text(
                "継続的な共有",
                "3日間連続で気持ちを共有",
                "3日間連続で木のくぼみを使用",
            ),
        ],
    },
    AchievementDefinition {
        id: TEN_CONFESSIONS,
        category: Category::Interaction,
        points: 50,
        icon: "🌳",
        text: [
            text("知心好友", "累计对话10次", "与树洞累计对话10次"),
            text(
                "Close Friend",
                "Cumulative 10 conversations",
                "Have 10 cumulative conversations with the tree hollow",
            ),
            text("親しい友達", "累計10回の会話", "木のくぼみと累計10回会話する"),
        ],
    },
    AchievementDefinition {
        id: THOUSAND_WORDS,
        category: Category::Interaction,
        points: 50,
        icon: "📚",
        text: [
            text("心灵默契", "累计分享1000字", "累计分享1000字的心情"),
            text(
                "Soul Connection",
                "Share 1000 words cumulatively",
                "Share 1000 words of feelings cumulatively",
            ),
            text("心の繋がり", "累計1000文字を共有", "累計1000文字の気持ちを共有"),
        ],
    },
    AchievementDefinition {
        id: SEVEN_DAY_CHECKIN,
        category: Category::Streak,
        points: 70,
        icon: "📅",
        text: [
            text("坚持不懈", "连续签到7天", "连续7天登录并签到"),
            text(
                "Persistence",
                "Check in for 7 consecutive days",
                "Log in and check in for 7 consecutive days",
            ),
            text(
                "継続は力なり",
                "7日間連続でチェックイン",
                "7日間連続でログインしチェックインする",
            ),
        ],
    },
    AchievementDefinition {
        id: POSITIVE_EMOTION,
        category: Category::Emotion,
        points: 40,
        icon: "☀️",
        text: [
            text("阳光心态", "5次积极情绪分享", "分享5次情绪值>80的内容"),
            text(
                "Positive Attitude",
                "5 positive emotional shares",
                "Share 5 contents with emotion value >80",
            ),
            text(
                "ポジティブな姿勢",
                "5回のポジティブな感情の共有",
                "感情値>80のコンテンツを5回共有",
            ),
        ],
    },
    AchievementDefinition {
        id: EMOTIONAL_GROWTH,
        category: Category::Emotion,
        points: 60,
        icon: "📈",
        text: [
            text("情绪成长", "从低情绪值到高情绪值", "从情绪值<30提升到>70"),
            text(
                "Emotional Growth",
                "From low to high emotion value",
                "From emotion value <30 to >70",
            ),
            text("感情的成長", "低い感情値から高い感情値へ", "感情値<30から>70へ"),
        ],
    },
    AchievementDefinition {
        id: VOICE_DIARY,
        category: Category::Interaction,
        points: 80,
        icon: "🎤",
        text: [
            text("声音日记", "记录20条语音记忆", "录制20条语音记忆"),
            text(
                "Voice Diary",
                "Record 20 voice memories",
                "Record 20 voice memories",
            ),
            text("音声日記", "20の音声記憶を記録", "20の音声記憶を記録する"),
        ],
    },
];

/// Look up a definition by its stable id.
pub fn find(id: &str) -> Option<&'static AchievementDefinition> {
    CATALOG.iter().find(|def| def.id == id)
}
