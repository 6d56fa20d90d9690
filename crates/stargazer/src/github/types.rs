//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A starred repository snapshot, created fresh from the API on every run.
///
/// `full_name` (owner/name) is the reconciliation key against the destination
/// database and must be unique within one run's source set.
#[derive(Debug, Clone)]
pub struct StarredRepo {
    /// Repository ID.
    pub id: i64,
    /// Repository name.
    pub name: String,
    /// Full name including owner (e.g., "owner/repo").
    pub full_name: String,
    /// Repository description.
    pub description: Option<String>,
    /// HTML URL to the repository.
    pub html_url: String,
    /// When the user starred the repository.
    pub starred_at: DateTime<Utc>,
    /// Primary programming language.
    pub language: Option<String>,
    /// Number of stars.
    pub stargazers_count: u32,
    /// When the repo was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StarredRepo {
    /// The owner segment of the full name.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(&self.full_name)
    }

    /// The repository segment of the full name.
    #[must_use]
    pub fn repo(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(_, repo)| repo)
            .unwrap_or(&self.name)
    }
}

/// A tagged release of a repository - fields we need from the API response.
///
/// API docs: https://docs.github.com/rest/releases/releases
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release ID.
    pub id: i64,
    /// Git tag the release points at.
    pub tag_name: String,
    /// Display name of the release.
    pub name: Option<String>,
    /// Release notes body.
    pub body: Option<String>,
    /// HTML URL to the release.
    pub html_url: String,
    /// When the release was published (absent for drafts).
    pub published_at: Option<DateTime<Utc>>,
    /// When the release was created.
    pub created_at: DateTime<Utc>,
    /// Whether the release is marked as a prerelease.
    pub prerelease: bool,
}

/// One entry of the starred listing under the
/// `application/vnd.github.star+json` media type, which nests the repository
/// next to the star timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredItem {
    /// When the user starred the repository (may be absent).
    pub starred_at: Option<DateTime<Utc>>,
    /// The repository itself.
    pub repo: RepoPayload,
}

impl StarredItem {
    /// Convert into a [`StarredRepo`], using `fallback_starred_at` when the
    /// API omitted the star timestamp.
    #[must_use]
    pub fn into_repo(self, fallback_starred_at: DateTime<Utc>) -> StarredRepo {
        StarredRepo {
            id: self.repo.id,
            name: self.repo.name,
            full_name: self.repo.full_name,
            description: self.repo.description,
            html_url: self.repo.html_url,
            starred_at: self.starred_at.unwrap_or(fallback_starred_at),
            language: self.repo.language,
            stargazers_count: self.repo.stargazers_count,
            updated_at: self.repo.updated_at,
        }
    }
}

/// Repository fields we need from the starred listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// Current rate limit status for the core API.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Maximum requests allowed per period.
    pub limit: usize,
    /// Remaining requests in current period.
    pub remaining: usize,
    /// When the rate limit resets.
    pub reset_at: DateTime<Utc>,
}

/// Wire shape of `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitCore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitCore {
    pub limit: usize,
    pub remaining: usize,
    /// Unix timestamp of the next reset.
    pub reset: i64,
}
