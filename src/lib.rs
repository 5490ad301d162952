//! Points, daily check-in and achievement engine for the tree hollow journaling service.
//!
//! Hollow rewards users for journaling. Every user has a points account backed by an
//! append-only ledger, a daily check-in streak with tiered bonuses, and progress on a
//! fixed catalog of eight achievements whose titles ship in Chinese, English and
//! Japanese.
//!
//! | Source | Points |
//! |--------|--------|
//! | Daily check-in | 5, plus 2 / 5 / 10 / 15 at streaks of 3 / 7 / 15 / 30 days |
//! | Achievement unlock | The catalog reward, paid exactly once |
//! | Manual / memory credit | Any amount, recorded in the ledger |
//!
//! # Architecture
//!
//! - **Storage**: SQLite through the [`store::RewardStore`] seam; one `BEGIN IMMEDIATE`
//!   transaction per user operation keeps the running total and ledger in lockstep
//! - **Rules**: [`rewards`] holds the ledger, check-in, achievement and journal
//!   trigger logic, all written against [`store::UserRecords`]
//! - **Transport**: an axum HTTP API ([`routes`]) and an operator CLI ([`cli`])
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`rewards`]: the async [`rewards::Rewards`] engine and its rules
//! - [`store`]: persistence traits and the SQLite adapter

pub mod cli;
pub mod config;
pub mod db;
pub mod rewards;
pub mod routes;
pub mod server;
pub mod store;
