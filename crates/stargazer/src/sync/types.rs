//! Shared sync types and tuning constants.

use std::str::FromStr;

use crate::github::{Release, StarredRepo};

/// Release lookups per parallel batch.
pub const RELEASE_BATCH_SIZE: usize = 10;

/// Pause between release-lookup batches in milliseconds.
pub const RELEASE_BATCH_PAUSE_MS: u64 = 1_000;

/// Translations per parallel batch.
pub const TRANSLATE_BATCH_SIZE: usize = 5;

/// Pause between translation batches in milliseconds.
pub const TRANSLATE_BATCH_PAUSE_MS: u64 = 200;

/// Destination writes per parallel batch.
pub const WRITE_BATCH_SIZE: usize = 5;

/// Pause between write batches in milliseconds.
pub const WRITE_BATCH_PAUSE_MS: u64 = 500;

/// Archive operations per parallel batch when clearing the destination.
pub const CLEAR_BATCH_SIZE: usize = 10;

/// Pause between archive batches in milliseconds.
pub const CLEAR_BATCH_PAUSE_MS: u64 = 500;

/// How source repositories are reconciled against existing destination rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileStrategy {
    /// Match source repos to existing rows by full name and update in place.
    #[default]
    Upsert,
    /// Archive every existing row first, then recreate all rows from scratch.
    WipeAndRecreate,
}

impl FromStr for ReconcileStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upsert" => Ok(Self::Upsert),
            "wipe" | "wipe-and-recreate" => Ok(Self::WipeAndRecreate),
            other => Err(format!(
                "unknown reconcile strategy \"{other}\" (expected \"upsert\" or \"wipe\")"
            )),
        }
    }
}

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Sync this user's stars instead of the authenticated user's.
    pub username: Option<String>,
    /// Reconciliation strategy against the destination database.
    pub strategy: ReconcileStrategy,
    /// Translate repository descriptions when the destination supports it.
    pub translate: bool,
    /// Dry run mode - report what would change without writing.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            username: None,
            strategy: ReconcileStrategy::Upsert,
            translate: true,
            dry_run: false,
        }
    }
}

/// Result of a sync run.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Starred repositories fetched from the source.
    pub fetched: usize,
    /// Destination rows created.
    pub created: usize,
    /// Destination rows updated in place.
    pub updated: usize,
    /// Repositories that resolved to a release.
    pub with_release: usize,
    /// Descriptions that were translated.
    pub translated: usize,
    /// Destination rows archived before the run (wipe strategy only).
    pub cleared: usize,
}

/// A starred repository enriched with its release and translated description,
/// ready for the destination writer.
#[derive(Debug, Clone)]
pub struct EnrichedRepo {
    pub repository: StarredRepo,
    pub release: Option<Release>,
    pub translated_description: Option<String>,
}
