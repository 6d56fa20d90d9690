//! Progress reporting for sync runs.
//!
//! Two modes:
//! - Interactive mode (TTY): animated progress bars using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

use std::sync::{Arc, Mutex};

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use stargazer::{ProgressCallback, SyncProgress};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| {
            reporter.handle(event);
        })
    }

    /// Finish all progress bars (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable progress state under a single lock.
#[derive(Default)]
struct ProgressState {
    stars_bar: Option<ProgressBar>,
    records_bar: Option<ProgressBar>,
    clear_bar: Option<ProgressBar>,
    releases_bar: Option<ProgressBar>,
    translate_bar: Option<ProgressBar>,
    write_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
///
/// One bar per pipeline stage: star fetching, destination listing/clearing,
/// release lookups, translation, and writes.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap();

        match event {
            SyncProgress::QuotaStatus {
                remaining,
                reset_at,
                low,
                ..
            } => {
                if low {
                    drop(state);
                    self.multi
                        .println(format!(
                            "⚠ Low rate limit: {remaining} remaining, resets at {reset_at}"
                        ))
                        .ok();
                }
            }

            SyncProgress::FetchingStars { username } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "Stars"));
                let msg = match username {
                    Some(user) => format!("Fetching repositories starred by {user}..."),
                    None => "Fetching your starred repositories...".to_string(),
                };
                pb.set_message(msg);
                state.stars_bar = Some(pb);
            }

            SyncProgress::FetchedStarsPage {
                page, total_so_far, ..
            } => {
                if let Some(ref pb) = state.stars_bar {
                    pb.set_message(format!("Page {page} ({total_so_far} repos)"));
                }
            }

            SyncProgress::StarsFetchComplete { total } => {
                if let Some(ref pb) = state.stars_bar {
                    pb.finish_with_message(format!("✓ {total} starred repos"));
                }
            }

            SyncProgress::ListingRecords => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "Notion"));
                pb.set_message("Fetching existing pages...");
                state.records_bar = Some(pb);
            }

            SyncProgress::RecordsListed { count } => {
                if let Some(ref pb) = state.records_bar {
                    pb.finish_with_message(format!("✓ {count} existing pages"));
                }
            }

            SyncProgress::ClearingRecords { count } => {
                let pb = self.multi.add(ProgressBar::new(count as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Clearing"));
                pb.set_message("Archiving pages...");
                state.clear_bar = Some(pb);
            }

            SyncProgress::RecordsCleared { count } => {
                if let Some(ref pb) = state.clear_bar {
                    pb.set_position(count as u64);
                    pb.finish_with_message(format!("✓ {count} pages archived"));
                }
            }

            SyncProgress::FetchingReleases { total } => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Releases"));
                pb.set_message("Fetching latest releases...");
                state.releases_bar = Some(pb);
            }

            SyncProgress::ReleaseResolved { full_name, tag } => {
                if let Some(ref pb) = state.releases_bar {
                    pb.inc(1);
                    match tag {
                        Some(tag) => pb.set_message(format!("✓ {full_name}: {tag}")),
                        None => pb.set_message(format!("○ {full_name}: No releases")),
                    }
                }
            }

            SyncProgress::ReleasesComplete {
                with_release,
                total,
            } => {
                if let Some(ref pb) = state.releases_bar {
                    pb.finish_with_message(format!("✓ {with_release}/{total} with releases"));
                }
            }

            SyncProgress::TranslatingDescriptions { total } => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Translating"));
                pb.set_message("Translating descriptions...");
                state.translate_bar = Some(pb);
            }

            SyncProgress::TranslatedBatch { done, total } => {
                if let Some(ref pb) = state.translate_bar {
                    pb.set_position(done as u64);
                    if done == total {
                        pb.finish_with_message(format!("✓ {total} descriptions"));
                    }
                }
            }

            SyncProgress::WritingRecords { count, dry_run } => {
                let pb = self.multi.add(ProgressBar::new(count as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Syncing"));
                let action = if dry_run {
                    "Checking (dry run)..."
                } else {
                    "Writing to Notion..."
                };
                pb.set_message(action.to_string());
                state.write_bar = Some(pb);
            }

            SyncProgress::RecordWritten { full_name, created } => {
                if let Some(ref pb) = state.write_bar {
                    pb.inc(1);
                    let action = if created { "Created" } else { "Updated" };
                    pb.set_message(format!("✓ {action}: {full_name}"));
                }
            }

            SyncProgress::WriteError { full_name, error } => {
                if let Some(ref pb) = state.write_bar {
                    pb.inc(1);
                    pb.set_message(format!("✗ {full_name}: {error}"));
                }
            }

            SyncProgress::SyncComplete { created, updated } => {
                if let Some(ref pb) = state.write_bar {
                    pb.finish_with_message(format!("✓ {created} created, {updated} updated"));
                }
            }

            SyncProgress::Warning { message } => {
                // Release lock before printing to avoid holding it during I/O
                drop(state);
                self.multi.println(format!("⚠ {message}")).ok();
            }
        }
    }

    /// Finish all progress bars.
    pub fn finish(&self) {
        let state = self.state.lock().unwrap();
        for pb in [
            &state.stars_bar,
            &state.records_bar,
            &state.clear_bar,
            &state.releases_bar,
            &state.translate_bar,
            &state.write_bar,
        ]
        .into_iter()
        .flatten()
        {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::QuotaStatus {
                remaining,
                limit,
                reset_at,
                low,
            } => {
                if low {
                    tracing::warn!(remaining, limit, reset_at = %reset_at, "Low rate limit");
                } else {
                    tracing::info!(remaining, limit, "Rate limit ok");
                }
            }

            SyncProgress::FetchingStars { username } => {
                tracing::info!(username = ?username, "Fetching starred repositories");
            }

            SyncProgress::FetchedStarsPage {
                page,
                count,
                total_so_far,
            } => {
                tracing::debug!(page, count, total_so_far, "Fetched page");
            }

            SyncProgress::StarsFetchComplete { total } => {
                tracing::info!(total, "Starred repositories fetched");
            }

            SyncProgress::FetchingReleases { total } => {
                tracing::info!(total, "Fetching latest releases");
            }

            SyncProgress::ReleaseResolved { full_name, tag } => {
                tracing::debug!(repo = %full_name, tag = ?tag, "Release resolved");
            }

            SyncProgress::ReleasesComplete {
                with_release,
                total,
            } => {
                tracing::info!(with_release, total, "Releases fetched");
            }

            SyncProgress::TranslatingDescriptions { total } => {
                tracing::info!(total, "Translating descriptions");
            }

            SyncProgress::TranslatedBatch { done, total } => {
                tracing::debug!(done, total, "Translation progress");
            }

            SyncProgress::ListingRecords => {
                tracing::info!("Fetching existing pages");
            }

            SyncProgress::RecordsListed { count } => {
                tracing::info!(count, "Existing pages fetched");
            }

            SyncProgress::ClearingRecords { count } => {
                tracing::info!(count, "Archiving pages");
            }

            SyncProgress::RecordsCleared { count } => {
                tracing::info!(count, "Pages archived");
            }

            SyncProgress::WritingRecords { count, dry_run } => {
                tracing::info!(count, dry_run, "Syncing repositories to Notion");
            }

            SyncProgress::RecordWritten { full_name, created } => {
                if created {
                    tracing::info!(repo = %full_name, "Created");
                } else {
                    tracing::info!(repo = %full_name, "Updated");
                }
            }

            SyncProgress::WriteError { full_name, error } => {
                tracing::error!(repo = %full_name, error = %error, "Failed to sync");
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            SyncProgress::SyncComplete { created, updated } => {
                tracing::info!(created, updated, "Sync complete");
            }
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
