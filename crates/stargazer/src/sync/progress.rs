//! Progress reporting for sync operations.

use chrono::{DateTime, Utc};

/// Progress callback for sync operations.
///
/// The library emits [`SyncProgress`] events through this callback; rendering
/// (progress bars, structured logs) is the caller's concern.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Events emitted while a sync run progresses through its stages.
#[derive(Debug, Clone)]
pub enum SyncProgress {
    /// Result of a pre- or post-run quota check.
    QuotaStatus {
        remaining: usize,
        limit: usize,
        reset_at: DateTime<Utc>,
        low: bool,
    },

    /// Starting to page through the starred listing.
    FetchingStars { username: Option<String> },
    /// One page of starred repositories arrived.
    FetchedStarsPage {
        page: u32,
        count: usize,
        total_so_far: usize,
    },
    /// The starred listing is complete.
    StarsFetchComplete { total: usize },

    /// Starting the per-repository release lookups.
    FetchingReleases { total: usize },
    /// One repository's release lookup settled.
    ReleaseResolved {
        full_name: String,
        tag: Option<String>,
    },
    /// All release lookups settled.
    ReleasesComplete { with_release: usize, total: usize },

    /// Starting description translation.
    TranslatingDescriptions { total: usize },
    /// Translation progress (counts items, not batches).
    TranslatedBatch { done: usize, total: usize },

    /// Starting to page through existing destination records.
    ListingRecords,
    /// Destination listing complete.
    RecordsListed { count: usize },

    /// Starting to archive existing destination records.
    ClearingRecords { count: usize },
    /// All destination records archived.
    RecordsCleared { count: usize },

    /// Starting to write records to the destination.
    WritingRecords { count: usize, dry_run: bool },
    /// One record was created or updated.
    RecordWritten { full_name: String, created: bool },
    /// One record failed to write.
    WriteError { full_name: String, error: String },

    /// A non-fatal condition worth surfacing to the user.
    Warning { message: String },

    /// The run finished.
    SyncComplete { created: usize, updated: usize },
}

/// Emit an event if a callback is present.
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
