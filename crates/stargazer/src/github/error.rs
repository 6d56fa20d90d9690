//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("http transport error: {0}")]
    Http(String),

    #[error("invalid JSON from GitHub: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check if an error indicates a primary or secondary rate limit.
///
/// GitHub reports primary limits as 403 with an "API rate limit exceeded"
/// message and secondary limits as 403/429 with "secondary rate limit" in the
/// body. A plain 403 (bad credentials, missing scope) is not retryable.
pub fn is_rate_limit_error(e: &GitHubError) -> bool {
    match e {
        GitHubError::Api { status: 429, .. } => true,
        GitHubError::Api {
            status: 403,
            message,
        } => message.to_ascii_lowercase().contains("rate limit"),
        _ => false,
    }
}

/// Check if an error is an HTTP 404.
pub fn is_not_found(e: &GitHubError) -> bool {
    matches!(e, GitHubError::Api { status: 404, .. })
}

/// Check if an error is an HTTP 403.
pub fn is_forbidden(e: &GitHubError) -> bool {
    matches!(e, GitHubError::Api { status: 403, .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> GitHubError {
        GitHubError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn rate_limit_detection() {
        assert!(is_rate_limit_error(&api(429, "slow down")));
        assert!(is_rate_limit_error(&api(
            403,
            "API rate limit exceeded for user ID 1"
        )));
        assert!(is_rate_limit_error(&api(
            403,
            "You have exceeded a secondary rate limit"
        )));
        assert!(!is_rate_limit_error(&api(403, "Bad credentials")));
        assert!(!is_rate_limit_error(&api(500, "oops")));
        assert!(!is_rate_limit_error(&GitHubError::Http("timeout".into())));
    }

    #[test]
    fn not_found_detection() {
        assert!(is_not_found(&api(404, "Not Found")));
        assert!(!is_not_found(&api(403, "Forbidden")));
    }

    #[test]
    fn forbidden_detection() {
        assert!(is_forbidden(&api(403, "Forbidden")));
        assert!(!is_forbidden(&api(404, "Not Found")));
    }
}
