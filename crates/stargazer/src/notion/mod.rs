//! Notion API integration.
//!
//! The destination side of the sync: a bearer-token client over the Notion
//! REST API, cursor-paginated listing of existing database rows, the
//! name-to-page-id reconciliation index, batched upserts, and the
//! wipe-and-recreate path.

pub mod client;
pub mod error;
pub mod records;
pub mod types;
pub mod write;

pub use client::NotionClient;
pub use error::NotionError;
pub use records::{build_index, list_records};
pub use types::{DatabaseSchema, RemoteRecord, SchemaCapabilities};
pub use write::{clear_all, truncate_text, upsert, write_all};
