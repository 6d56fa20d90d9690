//! The `limits` command.

use console::Term;
use stargazer::GitHubClient;
use stargazer::github::LOW_QUOTA_THRESHOLD;

use crate::config::Config;

/// Show the current GitHub rate limit status.
pub async fn handle_limits(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let github = GitHubClient::new(&config.github_token()?)?;
    let info = github.rate_limit().await?;

    if Term::stdout().is_term() {
        println!(
            "Core API: {}/{} remaining, resets at {}",
            info.remaining, info.limit, info.reset_at
        );
        if info.remaining < LOW_QUOTA_THRESHOLD {
            eprintln!("Warning: quota is low - a large sync may be throttled");
        }
    } else {
        tracing::info!(
            remaining = info.remaining,
            limit = info.limit,
            reset_at = %info.reset_at,
            "Rate limit status"
        );
    }

    Ok(())
}
