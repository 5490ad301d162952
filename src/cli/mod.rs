//! Operator subcommands. Each opens the configured database directly and runs one
//! engine operation, so the CLI and a running server see the same records.

pub mod achievements;
pub mod doctor;
pub mod points;

pub use achievements::{achievements, unlock};
pub use doctor::doctor;
pub use points::{check_in, history, points};

use anyhow::{Context, Result};

use crate::rewards::types::UserId;

pub(crate) fn parse_user(raw: &str) -> Result<UserId> {
    UserId::parse(raw).context("user id must not be empty")
}
