//! Stargazer CLI - sync starred GitHub repositories to a Notion database.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stargazer")]
#[command(version)]
#[command(about = "Sync your starred GitHub repositories to a Notion database")]
#[command(
    long_about = "Stargazer fetches your starred GitHub repositories along with the latest \
release of each, optionally translates descriptions to Chinese, and writes \
everything into a Notion database - updating rows that already exist and \
creating rows for newly starred repositories."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync your starred repos into the configured database:
        $ stargazer sync

    Sync another user's stars:
        $ stargazer sync --user octocat

    Wipe the database and rebuild it from scratch:
        $ stargazer sync --wipe

    See what a sync would do without writing anything:
        $ stargazer sync --dry-run

    Show remaining GitHub API quota:
        $ stargazer limits

CONFIGURATION
    Stargazer reads configuration from:
      1. ~/.config/stargazer/config.toml (or $XDG_CONFIG_HOME/stargazer/config.toml)
      2. ./stargazer.toml
      3. Environment variables (see below)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GITHUB_TOKEN          GitHub personal access token (required)
    GITHUB_USERNAME       Sync this user's stars instead of your own (optional)
    NOTION_TOKEN          Notion integration token (required)
    NOTION_DATABASE_ID    Target Notion database id (required)
"#)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync starred repositories to the Notion database
    Sync {
        #[command(flatten)]
        args: SyncArgs,
    },
    /// Archive every row in the Notion database
    Clear {
        /// Show what would be archived without changing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Show current GitHub rate limit status
    Limits,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options for the sync command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SyncArgs {
    /// Sync this user's stars instead of the authenticated user's
    #[arg(short, long)]
    pub user: Option<String>,

    /// Archive all existing rows first and recreate everything from scratch
    #[arg(short, long)]
    pub wipe: bool,

    /// Skip translating repository descriptions
    #[arg(short = 'T', long)]
    pub no_translate: bool,

    /// Dry run - show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("stargazer=info,stargazer_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config file -> env vars)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { args } => {
            commands::sync::handle_sync(&config, &args).await?;
        }
        Commands::Clear { dry_run } => {
            commands::sync::handle_clear(&config, dry_run).await?;
        }
        Commands::Limits => {
            commands::limits::handle_limits(&config).await?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
    }

    Ok(())
}
