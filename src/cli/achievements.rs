use anyhow::Result;

use super::parse_user;
use crate::config::HollowConfig;
use crate::rewards::locale::Locale;
use crate::server::setup_rewards;

/// List every achievement with the user's state, in the requested locale.
pub async fn achievements(config: &HollowConfig, user: &str, locale: Option<&str>) -> Result<()> {
    let user = parse_user(user)?;
    let rewards = setup_rewards(config)?;
    let locale = locale.map_or(rewards.settings().default_locale, Locale::from_code);

    let views = rewards.get_achievements(&user, locale).await?;
    let unlocked = views.iter().filter(|v| v.unlocked).count();

    println!("Achievements for {user} ({unlocked}/{} unlocked)", views.len());
    println!("{}", "=".repeat(40));
    for v in &views {
        let mark = if v.unlocked { "x" } else { " " };
        println!(
            "  [{mark}] {} {:<20} {:<12} {:>3}%  +{:<4} {}",
            v.icon,
            v.id,
            v.category.as_str(),
            v.progress,
            v.points,
            v.title
        );
    }

    Ok(())
}

/// Unlock an achievement for a user, crediting its reward once.
pub async fn unlock(config: &HollowConfig, user: &str, achievement_id: &str) -> Result<()> {
    let user = parse_user(user)?;
    let rewards = setup_rewards(config)?;

    let outcome = rewards.unlock_achievement(&user, achievement_id).await?;
    if outcome.points > 0 {
        println!("Unlocked {achievement_id} for {user}: +{} points", outcome.points);
    } else {
        println!("{achievement_id} was already unlocked for {user}; nothing credited.");
    }

    Ok(())
}
