//! GitHub API client creation and rate limit checks.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use super::error::{GitHubError, is_rate_limit_error};
use super::types::{RateLimitInfo, RateLimitResponse};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::retry::with_retry;
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// Base URL of the GitHub REST API.
pub const GITHUB_API: &str = "https://api.github.com";

/// Default media type for API requests.
pub(crate) const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Media type that includes `starred_at` in the starred listing.
pub(crate) const ACCEPT_STAR: &str = "application/vnd.github.star+json";

/// Remaining-quota level below which a warning is surfaced.
pub const LOW_QUOTA_THRESHOLD: usize = 100;

/// GitHub API client.
///
/// A thin bearer-token client over [`HttpTransport`]. Rate-limit responses
/// (primary and secondary) are retried with exponential backoff inside this
/// client; callers only see them once the retry budget is exhausted.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client from a personal access token.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GitHubError::Http(e.to_string()))?;
        Ok(Self::with_transport(token, Arc::new(transport)))
    }

    pub fn with_transport(token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token: token.to_string(),
        }
    }

    /// Make an authenticated GET request, retrying on rate-limit signals.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        accept: &str,
    ) -> Result<T, GitHubError> {
        let url = format!("{GITHUB_API}{path}");

        let send = || async {
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: url.clone(),
                headers: vec![
                    ("Accept".to_string(), accept.to_string()),
                    ("User-Agent".to_string(), "stargazer".to_string()),
                    ("Authorization".to_string(), format!("Bearer {}", self.token)),
                ],
                body: Vec::new(),
            };

            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| GitHubError::Http(e.to_string()))?;

            if !(200..300).contains(&response.status) {
                let message = String::from_utf8_lossy(&response.body).trim().to_string();
                return Err(GitHubError::Api {
                    status: response.status,
                    message,
                });
            }

            Ok(response.body)
        };

        let body = with_retry(send, is_rate_limit_error).await?;
        serde_json::from_slice(&body).map_err(GitHubError::Json)
    }

    /// Get current rate limit status (core API only).
    pub async fn rate_limit(&self) -> Result<RateLimitInfo, GitHubError> {
        let response: RateLimitResponse = self.get("/rate_limit", ACCEPT_JSON).await?;
        let core = response.resources.core;

        Ok(RateLimitInfo {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: DateTime::from_timestamp(core.reset, 0).unwrap_or_else(Utc::now),
        })
    }
}

/// Check the remaining API quota and surface it as a progress event.
///
/// The check itself is best-effort: a failed lookup is logged and swallowed so
/// a quota probe can never abort a sync run.
pub async fn check_quota(client: &GitHubClient, on_progress: Option<&ProgressCallback>) {
    match client.rate_limit().await {
        Ok(info) => {
            let low = info.remaining < LOW_QUOTA_THRESHOLD;
            if low {
                tracing::warn!(
                    remaining = info.remaining,
                    reset_at = %info.reset_at,
                    "Low rate limit"
                );
            }
            emit(
                on_progress,
                SyncProgress::QuotaStatus {
                    remaining: info.remaining,
                    limit: info.limit,
                    reset_at: info.reset_at,
                    low,
                },
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to check rate limit");
        }
    }
}
