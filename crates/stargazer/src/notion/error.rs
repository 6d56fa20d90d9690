//! Notion API error types.

use thiserror::Error;

/// Errors that can occur when interacting with the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion API error ({code}): HTTP {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("http transport error: {0}")]
    Http(String),

    #[error("invalid JSON from Notion: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Database not found. Check the configured database id and make sure the integration has been granted access to it."
    )]
    DatabaseNotFound,

    #[error(
        "Unauthorized. Check the Notion token and make sure the integration has access to this database."
    )]
    Unauthorized,
}
