//! GitHub API integration.
//!
//! This module covers the source side of the sync: listing the starred
//! repositories of a user, resolving the latest release for each repository,
//! and checking the remaining API quota.
//!
//! # Module Structure
//!
//! - [`client`] - Authenticated API client and rate-limit quota checks
//! - [`types`] - Wire and domain types (`StarredRepo`, `Release`, ...)
//! - [`stars`] - Paginated starred-repository listing
//! - [`releases`] - Latest-release resolution with batched fan-out

pub mod client;
pub mod error;
pub mod releases;
pub mod stars;
pub mod types;

pub use client::{GitHubClient, LOW_QUOTA_THRESHOLD, check_quota};
pub use error::GitHubError;
pub use releases::{fetch_latest_release, fetch_releases};
pub use stars::fetch_starred;
pub use types::{RateLimitInfo, Release, StarredRepo};
