//! Latest-release resolution for starred repositories.

use std::collections::HashMap;
use std::time::Duration;

use super::client::{ACCEPT_JSON, GitHubClient};
use super::error::is_not_found;
use super::types::{Release, StarredRepo};
use crate::batch::map_batched;
use crate::sync::types::{RELEASE_BATCH_PAUSE_MS, RELEASE_BATCH_SIZE};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// How many recent releases to scan when the latest one is a prerelease.
pub const RELEASE_LOOKBACK: u32 = 10;

/// Resolve the release to show for one repository.
///
/// Stable releases are preferred: when the latest release is a prerelease, up
/// to [`RELEASE_LOOKBACK`] recent releases are scanned and the first
/// non-prerelease wins; with no stable release in range the prerelease is
/// kept. A 404 means the repository simply has no releases. Every other
/// failure is logged and degrades to `None` - never an error.
pub async fn fetch_latest_release(client: &GitHubClient, repo: &StarredRepo) -> Option<Release> {
    let owner = repo.owner();
    let name = repo.repo();

    let latest: Release = match client
        .get(&format!("/repos/{owner}/{name}/releases/latest"), ACCEPT_JSON)
        .await
    {
        Ok(release) => release,
        Err(e) if is_not_found(&e) => return None,
        Err(e) => {
            tracing::warn!(repo = %repo.full_name, error = %e, "Failed to fetch latest release");
            return None;
        }
    };

    if latest.prerelease {
        match client
            .get::<Vec<Release>>(
                &format!("/repos/{owner}/{name}/releases?per_page={RELEASE_LOOKBACK}"),
                ACCEPT_JSON,
            )
            .await
        {
            Ok(recent) => {
                if let Some(stable) = recent.into_iter().find(|r| !r.prerelease) {
                    return Some(stable);
                }
            }
            Err(e) => {
                tracing::debug!(repo = %repo.full_name, error = %e, "Keeping prerelease");
            }
        }
    }

    Some(latest)
}

/// Fetch the latest release for each repository, keyed by full name.
///
/// Runs in batches of [`RELEASE_BATCH_SIZE`] with a fixed pause between
/// batches. One repository's failure never aborts the batch: it is recorded
/// as `None`.
pub async fn fetch_releases(
    client: &GitHubClient,
    repos: &[StarredRepo],
    on_progress: Option<&ProgressCallback>,
) -> HashMap<String, Option<Release>> {
    let total = repos.len();
    emit(on_progress, SyncProgress::FetchingReleases { total });

    let client = client.clone();
    let results = map_batched(
        repos.to_vec(),
        RELEASE_BATCH_SIZE,
        Duration::from_millis(RELEASE_BATCH_PAUSE_MS),
        move |repo| {
            let client = client.clone();
            async move {
                let release = fetch_latest_release(&client, &repo).await;
                (repo.full_name, release)
            }
        },
        |(full_name, release)| {
            emit(
                on_progress,
                SyncProgress::ReleaseResolved {
                    full_name: full_name.clone(),
                    tag: release.as_ref().map(|r| r.tag_name.clone()),
                },
            );
        },
    )
    .await;

    let with_release = results.iter().filter(|(_, r)| r.is_some()).count();
    emit(
        on_progress,
        SyncProgress::ReleasesComplete {
            with_release,
            total,
        },
    );

    results.into_iter().collect()
}
