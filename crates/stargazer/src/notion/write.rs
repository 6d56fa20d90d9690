//! Destination writes: property mapping, upserts, and the wipe path.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::client::NotionClient;
use super::error::NotionError;
use super::records::list_records;
use super::types::{
    PROP_DESCRIPTION, PROP_DESCRIPTION_ZH, PROP_LAST_SYNCED_AT, PROP_LATEST_RELEASE, PROP_NAME,
    PROP_RELEASE_BODY, PROP_RELEASE_PUBLISHED_AT, PROP_STARRED_AT, PROP_URL, Page,
    SchemaCapabilities,
};
use crate::sync::types::{
    CLEAR_BATCH_PAUSE_MS, CLEAR_BATCH_SIZE, EnrichedRepo, WRITE_BATCH_PAUSE_MS, WRITE_BATCH_SIZE,
};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// Maximum characters for the release body property, ellipsis included.
pub const RELEASE_BODY_LIMIT: usize = 2000;

/// Shown when a repository has no releases at all.
pub const NO_RELEASES: &str = "No releases";

/// Counts of rows created vs updated by a write pass.
#[derive(Debug, Default)]
pub struct WriteStats {
    pub created: usize,
    pub updated: usize,
}

/// Truncate `text` to at most `max_len` characters, ellipsis included.
///
/// Truncation keeps `max_len - 3` characters and appends `"..."`, so the
/// result is exactly `max_len` characters long when truncation happens.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Build the property payload for one repository row.
#[must_use]
pub fn build_properties(
    enriched: &EnrichedRepo,
    caps: SchemaCapabilities,
    now: DateTime<Utc>,
) -> serde_json::Value {
    let repo = &enriched.repository;
    let release = enriched.release.as_ref();

    let latest_release = release
        .and_then(|r| r.name.clone().filter(|n| !n.is_empty()))
        .or_else(|| release.map(|r| r.tag_name.clone()))
        .unwrap_or_else(|| NO_RELEASES.to_string());

    let release_body = release.and_then(|r| r.body.clone()).unwrap_or_default();

    let mut properties = serde_json::Map::new();
    properties.insert(
        PROP_NAME.to_string(),
        json!({ "title": [{ "text": { "content": repo.full_name } }] }),
    );
    properties.insert(
        PROP_DESCRIPTION.to_string(),
        json!({ "rich_text": [{ "text": { "content": repo.description.clone().unwrap_or_default() } }] }),
    );
    if caps.translated_description
        && let Some(ref translated) = enriched.translated_description
    {
        properties.insert(
            PROP_DESCRIPTION_ZH.to_string(),
            json!({ "rich_text": [{ "text": { "content": translated } }] }),
        );
    }
    properties.insert(PROP_URL.to_string(), json!({ "url": repo.html_url }));
    properties.insert(
        PROP_STARRED_AT.to_string(),
        json!({ "date": { "start": repo.starred_at.to_rfc3339() } }),
    );
    properties.insert(
        PROP_LATEST_RELEASE.to_string(),
        json!({ "rich_text": [{ "text": { "content": latest_release } }] }),
    );
    properties.insert(
        PROP_RELEASE_BODY.to_string(),
        json!({ "rich_text": [{ "text": { "content": truncate_text(&release_body, RELEASE_BODY_LIMIT) } }] }),
    );
    match release.and_then(|r| r.published_at) {
        Some(published) => {
            properties.insert(
                PROP_RELEASE_PUBLISHED_AT.to_string(),
                json!({ "date": { "start": published.to_rfc3339() } }),
            );
        }
        None => {
            // Explicit null clears a stale date left from a previous sync.
            properties.insert(PROP_RELEASE_PUBLISHED_AT.to_string(), serde_json::Value::Null);
        }
    }
    properties.insert(
        PROP_LAST_SYNCED_AT.to_string(),
        json!({ "date": { "start": now.to_rfc3339() } }),
    );

    serde_json::Value::Object(properties)
}

/// Create or update one destination row.
///
/// Updates in place when `existing_id` is supplied, otherwise creates a new
/// row under the database. Returns whether a row was created.
pub async fn upsert(
    client: &NotionClient,
    database_id: &str,
    enriched: &EnrichedRepo,
    existing_id: Option<&str>,
    caps: SchemaCapabilities,
    now: DateTime<Utc>,
) -> Result<bool, NotionError> {
    let properties = build_properties(enriched, caps, now);

    match existing_id {
        Some(page_id) => {
            client
                .patch(
                    &format!("/pages/{page_id}"),
                    json!({ "properties": properties }),
                )
                .await?;
            Ok(false)
        }
        None => {
            client
                .post_json::<Page>(
                    "/pages",
                    json!({
                        "parent": { "type": "database_id", "database_id": database_id },
                        "properties": properties
                    }),
                )
                .await?;
            Ok(true)
        }
    }
}

/// Write every enriched repository to the destination.
///
/// Runs in batches of [`WRITE_BATCH_SIZE`] with a fixed pause between
/// batches. A failed item aborts the remaining batches once its own batch has
/// fully settled; rows written by completed batches stay written.
pub async fn write_all(
    client: &NotionClient,
    database_id: &str,
    items: &[EnrichedRepo],
    index: &HashMap<String, String>,
    caps: SchemaCapabilities,
    dry_run: bool,
    on_progress: Option<&ProgressCallback>,
) -> Result<WriteStats, NotionError> {
    let total = items.len();
    emit(
        on_progress,
        SyncProgress::WritingRecords {
            count: total,
            dry_run,
        },
    );

    let mut stats = WriteStats::default();

    if dry_run {
        for item in items {
            let created = !index.contains_key(&item.repository.full_name);
            if created {
                stats.created += 1;
            } else {
                stats.updated += 1;
            }
            emit(
                on_progress,
                SyncProgress::RecordWritten {
                    full_name: item.repository.full_name.clone(),
                    created,
                },
            );
        }
        return Ok(stats);
    }

    let mut processed = 0usize;
    let mut pending = items.iter();

    loop {
        let batch: Vec<&EnrichedRepo> = pending.by_ref().take(WRITE_BATCH_SIZE).collect();
        if batch.is_empty() {
            break;
        }

        let mut handles = Vec::with_capacity(batch.len());
        for item in batch {
            let existing_id = index.get(&item.repository.full_name).cloned();
            let client = client.clone();
            let database_id = database_id.to_string();
            let item = item.clone();
            handles.push(tokio::spawn(async move {
                let outcome = upsert(
                    &client,
                    &database_id,
                    &item,
                    existing_id.as_deref(),
                    caps,
                    Utc::now(),
                )
                .await;
                (item.repository.full_name, outcome)
            }));
        }

        let mut failure: Option<NotionError> = None;
        for handle in handles {
            let (full_name, outcome) = handle.await.expect("write task panicked");
            processed += 1;
            match outcome {
                Ok(created) => {
                    if created {
                        stats.created += 1;
                    } else {
                        stats.updated += 1;
                    }
                    emit(
                        on_progress,
                        SyncProgress::RecordWritten { full_name, created },
                    );
                }
                Err(e) => {
                    tracing::error!(repo = %full_name, error = %e, "Failed to sync record");
                    emit(
                        on_progress,
                        SyncProgress::WriteError {
                            full_name,
                            error: e.to_string(),
                        },
                    );
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        // The failed batch has fully settled; everything after it is skipped.
        if let Some(e) = failure {
            return Err(e);
        }

        if processed < total {
            tokio::time::sleep(Duration::from_millis(WRITE_BATCH_PAUSE_MS)).await;
        }
    }

    Ok(stats)
}

/// Archive every row of the database.
///
/// Used by the wipe-and-recreate strategy and the standalone clear command.
/// Returns the number of rows archived.
pub async fn clear_all(
    client: &NotionClient,
    database_id: &str,
    dry_run: bool,
    on_progress: Option<&ProgressCallback>,
) -> Result<usize, NotionError> {
    let records = list_records(client, database_id, on_progress).await?;

    if records.is_empty() {
        tracing::info!("Database is already empty");
        emit(on_progress, SyncProgress::RecordsCleared { count: 0 });
        return Ok(0);
    }

    let total = records.len();
    emit(on_progress, SyncProgress::ClearingRecords { count: total });

    if dry_run {
        emit(on_progress, SyncProgress::RecordsCleared { count: total });
        return Ok(total);
    }

    let mut processed = 0usize;
    let mut pending = records.into_iter();

    loop {
        let batch: Vec<_> = pending.by_ref().take(CLEAR_BATCH_SIZE).collect();
        if batch.is_empty() {
            break;
        }

        let mut handles = Vec::with_capacity(batch.len());
        for record in batch {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                let outcome = client
                    .patch(&format!("/pages/{}", record.id), json!({ "archived": true }))
                    .await;
                (record.name, outcome)
            }));
        }

        let mut failure: Option<NotionError> = None;
        for handle in handles {
            let (name, outcome) = handle.await.expect("clear task panicked");
            processed += 1;
            if let Err(e) = outcome {
                tracing::error!(record = %name, error = %e, "Failed to archive record");
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        if processed < total {
            tokio::time::sleep(Duration::from_millis(CLEAR_BATCH_PAUSE_MS)).await;
        }
    }

    emit(on_progress, SyncProgress::RecordsCleared { count: total });
    Ok(total)
}
