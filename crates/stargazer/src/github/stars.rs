//! Paginated starred-repository listing.

use chrono::Utc;

use super::client::{ACCEPT_STAR, GitHubClient};
use super::error::{GitHubError, is_forbidden, is_not_found};
use super::types::{StarredItem, StarredRepo};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// Page size for the starred listing.
pub const STARS_PAGE_SIZE: u32 = 100;

/// Fetch every repository starred by a user, newest star first.
///
/// Targets the authenticated user when `username` is `None`, otherwise the
/// named user. Pagination stops on the first empty or short page. The listing
/// is not resumable: any page failure aborts the whole fetch.
pub async fn fetch_starred(
    client: &GitHubClient,
    username: Option<&str>,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<StarredRepo>, GitHubError> {
    let mut repos: Vec<StarredRepo> = Vec::new();
    let mut page = 1u32;

    emit(
        on_progress,
        SyncProgress::FetchingStars {
            username: username.map(String::from),
        },
    );

    loop {
        let path = match username {
            Some(user) => format!(
                "/users/{user}/starred?per_page={STARS_PAGE_SIZE}&page={page}&sort=created&direction=desc"
            ),
            None => format!(
                "/user/starred?per_page={STARS_PAGE_SIZE}&page={page}&sort=created&direction=desc"
            ),
        };

        let items: Vec<StarredItem> = match client.get(&path, ACCEPT_STAR).await {
            Ok(items) => items,
            Err(e) if is_not_found(&e) => {
                tracing::error!("No starred repositories found (HTTP 404)");
                return Err(e);
            }
            Err(e) if is_forbidden(&e) => {
                tracing::error!(error = %e, "Rate limit exceeded or authentication failed");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let count = items.len();
        let now = Utc::now();
        repos.extend(items.into_iter().map(|item| item.into_repo(now)));

        emit(
            on_progress,
            SyncProgress::FetchedStarsPage {
                page,
                count,
                total_so_far: repos.len(),
            },
        );

        if count < STARS_PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }

    emit(
        on_progress,
        SyncProgress::StarsFetchComplete {
            total: repos.len(),
        },
    );

    Ok(repos)
}
