use anyhow::Result;

use super::parse_user;
use crate::config::HollowConfig;
use crate::rewards::locale::Locale;
use crate::server::setup_rewards;

/// Print a user's balance and check-in state.
pub async fn points(config: &HollowConfig, user: &str) -> Result<()> {
    let user = parse_user(user)?;
    let rewards = setup_rewards(config)?;

    let account = rewards.get_points(&user).await?;
    let audit = rewards.verify_ledger(&user).await?;

    println!("Points for {user}");
    println!("{}", "=".repeat(40));
    println!("  Total points:        {}", account.total_points);
    println!("  Check-in streak:     {}", account.check_in_streak);
    match account.last_check_in {
        Some(at) => println!("  Last check-in:       {}", at.to_rfc3339()),
        None => println!("  Last check-in:       (never)"),
    }
    if audit.consistent {
        println!("  Ledger:              OK");
    } else {
        println!(
            "  Ledger:              DRIFT (ledger sums to {})",
            audit.ledger_sum
        );
    }

    Ok(())
}

/// Claim today's check-in for a user.
pub async fn check_in(config: &HollowConfig, user: &str, locale: Option<&str>) -> Result<()> {
    let user = parse_user(user)?;
    let rewards = setup_rewards(config)?;

    let outcome = rewards
        .check_in(&user, locale.map(Locale::from_code))
        .await?;

    println!("{}", outcome.message);
    if outcome.success {
        println!("  Awarded:             {}", outcome.points_awarded);
    }
    println!("  Streak:              {}", outcome.streak);
    for id in &outcome.unlocked {
        println!("  Unlocked:            {id}");
    }

    Ok(())
}

/// Print a user's most recent ledger entries.
pub async fn history(config: &HollowConfig, user: &str, limit: Option<usize>) -> Result<()> {
    let user = parse_user(user)?;
    let rewards = setup_rewards(config)?;

    let entries = rewards.history(&user, limit).await?;
    if entries.is_empty() {
        println!("No ledger entries for {user}.");
        return Ok(());
    }

    println!("{:<26} {:>7}  {:<12} {}", "When", "Amount", "Source", "Description");
    for e in &entries {
        println!(
            "{:<26} {:>7}  {:<12} {}",
            e.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            e.amount,
            e.source.as_str(),
            e.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
