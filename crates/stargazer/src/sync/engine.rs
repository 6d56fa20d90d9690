//! The sync pipeline.

use std::collections::HashMap;

use thiserror::Error;

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{EnrichedRepo, ReconcileStrategy, SyncOptions, SyncOutcome};
use crate::github::error::GitHubError;
use crate::github::{GitHubClient, check_quota, fetch_releases, fetch_starred};
use crate::notion::error::NotionError;
use crate::notion::types::SchemaCapabilities;
use crate::notion::{NotionClient, build_index, clear_all, list_records, write_all};
use crate::translate::Translator;

/// A stage-fatal sync failure.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Notion(#[from] NotionError),
}

/// Run one full sync.
///
/// The pipeline is a straight line: validate the destination and read its
/// schema, check quota, fetch the starred listing, prepare the destination
/// per the reconcile strategy, resolve releases, optionally translate
/// descriptions, write everything, and check quota again.
///
/// An empty starred listing succeeds immediately without touching any
/// destination rows. There is no checkpointing: a failed run is re-run from
/// scratch.
pub async fn perform_sync(
    github: &GitHubClient,
    notion: &NotionClient,
    translator: &Translator,
    database_id: &str,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncOutcome, SyncError> {
    let schema = notion.retrieve_database(database_id).await?;
    let caps = SchemaCapabilities::from_schema(&schema);

    check_quota(github, on_progress).await;

    let repos = fetch_starred(github, options.username.as_deref(), on_progress).await?;
    let mut outcome = SyncOutcome {
        fetched: repos.len(),
        ..Default::default()
    };

    if repos.is_empty() {
        emit(
            on_progress,
            SyncProgress::Warning {
                message: "No starred repositories found, nothing to sync".to_string(),
            },
        );
        return Ok(outcome);
    }

    let index = match options.strategy {
        ReconcileStrategy::WipeAndRecreate => {
            outcome.cleared = clear_all(notion, database_id, options.dry_run, on_progress).await?;
            HashMap::new()
        }
        ReconcileStrategy::Upsert => {
            let records = list_records(notion, database_id, on_progress).await?;
            build_index(&records)
        }
    };

    let mut releases = fetch_releases(github, &repos, on_progress).await;

    let translations = if options.translate && caps.translated_description {
        let texts: Vec<String> = repos
            .iter()
            .map(|r| r.description.clone().unwrap_or_default())
            .collect();
        Some(translator.translate_batch(texts, on_progress).await)
    } else {
        None
    };

    let enriched: Vec<EnrichedRepo> = repos
        .into_iter()
        .enumerate()
        .map(|(i, repository)| {
            let release = releases.remove(&repository.full_name).flatten();
            let translated_description = translations
                .as_ref()
                .and_then(|t| t.get(i))
                .filter(|t| !t.is_empty())
                .cloned();
            EnrichedRepo {
                repository,
                release,
                translated_description,
            }
        })
        .collect();

    outcome.with_release = enriched.iter().filter(|e| e.release.is_some()).count();
    outcome.translated = enriched
        .iter()
        .filter(|e| e.translated_description.is_some())
        .count();

    let stats = write_all(
        notion,
        database_id,
        &enriched,
        &index,
        caps,
        options.dry_run,
        on_progress,
    )
    .await?;
    outcome.created = stats.created;
    outcome.updated = stats.updated;

    check_quota(github, on_progress).await;

    emit(
        on_progress,
        SyncProgress::SyncComplete {
            created: outcome.created,
            updated: outcome.updated,
        },
    );

    Ok(outcome)
}
