//! The `sync` and `clear` commands.

use std::sync::Arc;

use console::Term;
use stargazer::sync::perform_sync;
use stargazer::{GitHubClient, NotionClient, ReconcileStrategy, SyncOptions, Translator};

use crate::SyncArgs;
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Run a full sync.
pub async fn handle_sync(
    config: &Config,
    args: &SyncArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let github = GitHubClient::new(&config.github_token()?)?;
    let notion = NotionClient::new(&config.notion_token()?)?;
    let translator = Translator::new()?;
    let database_id = config.notion_database_id()?;

    let options = SyncOptions {
        username: args.user.clone().or_else(|| config.github_username()),
        strategy: if args.wipe {
            ReconcileStrategy::WipeAndRecreate
        } else {
            config.strategy()?
        },
        translate: config.translate() && !args.no_translate,
        dry_run: args.dry_run,
    };

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let outcome = perform_sync(
        &github,
        &notion,
        &translator,
        &database_id,
        &options,
        Some(&callback),
    )
    .await?;
    reporter.finish();

    if Term::stdout().is_term() {
        println!(
            "\nSync complete: {} fetched, {} created, {} updated, {} with releases",
            outcome.fetched, outcome.created, outcome.updated, outcome.with_release
        );
        if options.dry_run {
            println!("(dry run - nothing was written)");
        }
    } else {
        tracing::info!(
            fetched = outcome.fetched,
            created = outcome.created,
            updated = outcome.updated,
            with_release = outcome.with_release,
            dry_run = options.dry_run,
            "Sync complete"
        );
    }

    Ok(())
}

/// Archive every row of the destination database without syncing.
pub async fn handle_clear(config: &Config, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let notion = NotionClient::new(&config.notion_token()?)?;
    let database_id = config.notion_database_id()?;

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let cleared = stargazer::notion::clear_all(&notion, &database_id, dry_run, Some(&callback)).await?;
    reporter.finish();

    if Term::stdout().is_term() {
        if dry_run {
            println!("\n{cleared} pages would be archived");
        } else {
            println!("\n{cleared} pages archived");
        }
    } else {
        tracing::info!(cleared, dry_run, "Clear complete");
    }

    Ok(())
}
