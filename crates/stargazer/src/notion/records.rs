//! Existing-record listing and the reconciliation index.

use std::collections::HashMap;

use serde_json::json;

use super::client::NotionClient;
use super::error::NotionError;
use super::types::{QueryResponse, RemoteRecord};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// List every non-archived row of the database.
///
/// Follows the opaque `next_cursor` until the API reports no further pages.
/// Pages without readable title text cannot be reconciled and are skipped.
pub async fn list_records(
    client: &NotionClient,
    database_id: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<RemoteRecord>, NotionError> {
    emit(on_progress, SyncProgress::ListingRecords);

    let mut records: Vec<RemoteRecord> = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let body = match cursor {
            Some(ref cur) => json!({ "start_cursor": cur }),
            None => json!({}),
        };

        let response: QueryResponse = client
            .post_json(&format!("/databases/{database_id}/query"), body)
            .await?;

        for page in response.results {
            if page.archived {
                continue;
            }
            match page.title() {
                Some(name) => records.push(RemoteRecord { id: page.id, name }),
                None => {
                    tracing::debug!(page_id = %page.id, "Skipping page without a title");
                }
            }
        }

        if !response.has_more {
            break;
        }
        cursor = response.next_cursor;
        if cursor.is_none() {
            // has_more without a cursor would loop on the first page forever.
            break;
        }
    }

    emit(
        on_progress,
        SyncProgress::RecordsListed {
            count: records.len(),
        },
    );

    Ok(records)
}

/// Build the name-to-page-id reconciliation index.
///
/// Duplicate names resolve last-one-wins, mirroring how the writer treats
/// duplicate source names.
#[must_use]
pub fn build_index(records: &[RemoteRecord]) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        index.insert(record.name.clone(), record.id.clone());
    }
    index
}
