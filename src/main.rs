use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hollow::{cli, config, server};

#[derive(Parser)]
#[command(name = "hollow", version, about = "Points, check-in and achievement service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Show a user's points balance and check-in state
    Points {
        user: String,
    },
    /// Claim today's check-in for a user
    CheckIn {
        user: String,
        /// Locale for the returned message (zh, en, ja)
        #[arg(long)]
        locale: Option<String>,
    },
    /// List achievements and a user's progress on each
    Achievements {
        user: String,
        /// Locale for titles and descriptions (zh, en, ja)
        #[arg(long)]
        locale: Option<String>,
    },
    /// Unlock an achievement for a user
    Unlock {
        user: String,
        achievement_id: String,
    },
    /// Show a user's most recent ledger entries
    History {
        user: String,
        /// Number of entries (1-500)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Check database integrity and ledger consistency
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::HollowConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Points { user } => cli::points(&config, &user).await?,
        Command::CheckIn { user, locale } => {
            cli::check_in(&config, &user, locale.as_deref()).await?
        }
        Command::Achievements { user, locale } => {
            cli::achievements(&config, &user, locale.as_deref()).await?
        }
        Command::Unlock {
            user,
            achievement_id,
        } => cli::unlock(&config, &user, &achievement_id).await?,
        Command::History { user, limit } => cli::history(&config, &user, limit).await?,
        Command::Doctor => cli::doctor(&config)?,
    }

    Ok(())
}
