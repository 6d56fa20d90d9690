//! Stargazer - sync starred GitHub repositories into a Notion database.
//!
//! This library fetches a user's starred repositories (and the latest release
//! of each) from the GitHub API, optionally translates descriptions to
//! Chinese, and reconciles the result against rows of a Notion database:
//! existing rows are matched by repository full name and updated in place,
//! new repositories get fresh rows.
//!
//! All external APIs are consumed through the [`http::HttpTransport`] trait,
//! which keeps every component testable against an in-memory transport.
//!
//! # Example
//!
//! ```ignore
//! use stargazer::{GitHubClient, NotionClient, Translator, perform_sync};
//! use stargazer::sync::SyncOptions;
//!
//! let github = GitHubClient::new(&github_token)?;
//! let notion = NotionClient::new(&notion_token)?;
//! let translator = Translator::new()?;
//!
//! let outcome = perform_sync(&github, &notion, &translator, &database_id,
//!     &SyncOptions::default(), None).await?;
//! ```

pub mod batch;
pub mod github;
pub mod http;
pub mod notion;
pub mod retry;
pub mod sync;
pub mod translate;

pub use github::{GitHubClient, GitHubError, RateLimitInfo, Release, StarredRepo};
pub use notion::{NotionClient, NotionError, RemoteRecord, SchemaCapabilities};
pub use sync::{
    EnrichedRepo, ProgressCallback, ReconcileStrategy, SyncError, SyncOptions, SyncOutcome,
    SyncProgress, perform_sync,
};
pub use translate::Translator;
