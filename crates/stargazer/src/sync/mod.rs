//! Sync orchestration.
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `SyncOptions`, `SyncOutcome`, `ReconcileStrategy`,
//!   batch-size and pacing constants
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - The pipeline: `perform_sync()`
//!
//! # Example
//!
//! ```ignore
//! use stargazer::{GitHubClient, NotionClient, Translator};
//! use stargazer::sync::{SyncOptions, perform_sync};
//!
//! let github = GitHubClient::new("ghp_...")?;
//! let notion = NotionClient::new("secret_...")?;
//! let translator = Translator::new()?;
//!
//! let outcome = perform_sync(
//!     &github,
//!     &notion,
//!     &translator,
//!     "database-id",
//!     &SyncOptions::default(),
//!     None,
//! )
//! .await?;
//! println!("{} created, {} updated", outcome.created, outcome.updated);
//! ```

pub mod engine;
mod progress;
pub mod types;

pub use engine::{SyncError, perform_sync};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{EnrichedRepo, ReconcileStrategy, SyncOptions, SyncOutcome};

pub use types::{
    CLEAR_BATCH_PAUSE_MS, CLEAR_BATCH_SIZE, RELEASE_BATCH_PAUSE_MS, RELEASE_BATCH_SIZE,
    TRANSLATE_BATCH_PAUSE_MS, TRANSLATE_BATCH_SIZE, WRITE_BATCH_PAUSE_MS, WRITE_BATCH_SIZE,
};
