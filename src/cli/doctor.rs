//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::HollowConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &HollowConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `hollow serve` or any user command to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    println!("Hollow Health Report");
    println!("====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Accounts:        {}", report.account_count);
    println!("  Ledger entries:  {}", report.history_count);
    println!("  Achievements:    {}", report.achievement_row_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }
    if report.drifted_accounts == 0 {
        println!("Ledger check:      PASSED");
    } else {
        println!(
            "Ledger check:      FAILED ({} account(s) differ from their ledger)",
            report.drifted_accounts
        );
    }

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Stop any running `hollow serve`.");
        println!("  2. Restore from a backup: cp backup.db {}", db_path.display());
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
