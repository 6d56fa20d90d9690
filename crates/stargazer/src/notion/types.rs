//! Notion API data types.

use std::collections::HashMap;

use serde::Deserialize;

/// Title property holding the repository full name (the reconciliation key).
pub const PROP_NAME: &str = "Name";
/// Rich-text property for the repository description.
pub const PROP_DESCRIPTION: &str = "Description";
/// Rich-text property for the translated description, if the database has one.
pub const PROP_DESCRIPTION_ZH: &str = "DescriptionZh";
/// URL property for the repository page.
pub const PROP_URL: &str = "URL";
/// Date property for when the repository was starred.
pub const PROP_STARRED_AT: &str = "StarredAt";
/// Rich-text property naming the latest release.
pub const PROP_LATEST_RELEASE: &str = "LatestRelease";
/// Rich-text property for the (truncated) release notes.
pub const PROP_RELEASE_BODY: &str = "ReleaseBody";
/// Date property for the release publish time.
pub const PROP_RELEASE_PUBLISHED_AT: &str = "ReleasePublishedAt";
/// Date property stamped with the sync time.
pub const PROP_LAST_SYNCED_AT: &str = "LastSyncedAt";

/// Database schema - the property map from `GET /v1/databases/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSchema {
    /// Database ID.
    pub id: String,
    /// Property name to descriptor.
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

/// One property descriptor of a database schema.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    /// Opaque property ID.
    pub id: String,
    /// Property type ("title", "rich_text", "date", "url", ...).
    #[serde(rename = "type")]
    pub kind: String,
}

/// What the destination schema supports beyond the required properties.
///
/// Computed once per run from the schema fetched at startup and passed by
/// value into the writer, so there is no hidden process-wide cache to guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCapabilities {
    /// The database has a rich-text property for the translated description.
    pub translated_description: bool,
}

impl SchemaCapabilities {
    #[must_use]
    pub fn from_schema(schema: &DatabaseSchema) -> Self {
        let translated_description = schema
            .properties
            .get(PROP_DESCRIPTION_ZH)
            .is_some_and(|p| p.kind == "rich_text");
        Self {
            translated_description,
        }
    }
}

/// Wire shape of `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// A database page - fields we need from the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Whether the page has been archived (soft-deleted).
    #[serde(default)]
    pub archived: bool,
    /// Property values, kept as raw JSON; only the title is read back.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Page {
    /// Extract the plain text of the page's title property, whatever the
    /// property is named.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        for value in self.properties.values() {
            if value.get("type").and_then(|t| t.as_str()) == Some("title")
                && let Some(parts) = value.get("title").and_then(|t| t.as_array())
            {
                let text: String = parts
                    .iter()
                    .filter_map(|p| p.get("plain_text").and_then(|s| s.as_str()))
                    .collect();
                if text.is_empty() {
                    return None;
                }
                return Some(text);
            }
        }
        None
    }
}

/// One existing destination row, reduced to what reconciliation needs.
#[derive(Debug, Clone)]
pub struct RemoteRecord {
    /// Opaque page ID.
    pub id: String,
    /// Display name (title text) used as the reconciliation key.
    pub name: String,
}

/// Wire shape of a Notion error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_with_title(name: &str) -> Page {
        serde_json::from_value(json!({
            "id": "page-1",
            "archived": false,
            "properties": {
                "Name": {
                    "id": "title",
                    "type": "title",
                    "title": [
                        { "type": "text", "plain_text": name }
                    ]
                },
                "URL": { "id": "abcd", "type": "url", "url": "https://example.com" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn title_extraction_finds_the_title_property() {
        assert_eq!(page_with_title("owner/repo").title().as_deref(), Some("owner/repo"));
    }

    #[test]
    fn title_extraction_concatenates_segments() {
        let page: Page = serde_json::from_value(json!({
            "id": "page-2",
            "properties": {
                "Titel": {
                    "id": "title",
                    "type": "title",
                    "title": [
                        { "type": "text", "plain_text": "owner/" },
                        { "type": "text", "plain_text": "repo" }
                    ]
                }
            }
        }))
        .unwrap();
        assert_eq!(page.title().as_deref(), Some("owner/repo"));
    }

    #[test]
    fn empty_title_is_none() {
        let page: Page = serde_json::from_value(json!({
            "id": "page-3",
            "properties": {
                "Name": { "id": "title", "type": "title", "title": [] }
            }
        }))
        .unwrap();
        assert!(page.title().is_none());
    }

    #[test]
    fn capabilities_detect_the_translated_description_property() {
        let schema: DatabaseSchema = serde_json::from_value(json!({
            "id": "db-1",
            "properties": {
                "Name": { "id": "title", "type": "title" },
                "DescriptionZh": { "id": "zh", "type": "rich_text" }
            }
        }))
        .unwrap();
        assert!(SchemaCapabilities::from_schema(&schema).translated_description);
    }

    #[test]
    fn capabilities_require_the_right_property_type() {
        let schema: DatabaseSchema = serde_json::from_value(json!({
            "id": "db-2",
            "properties": {
                "Name": { "id": "title", "type": "title" },
                "DescriptionZh": { "id": "zh", "type": "number" }
            }
        }))
        .unwrap();
        assert!(!SchemaCapabilities::from_schema(&schema).translated_description);

        let schema: DatabaseSchema = serde_json::from_value(json!({
            "id": "db-3",
            "properties": { "Name": { "id": "title", "type": "title" } }
        }))
        .unwrap();
        assert!(!SchemaCapabilities::from_schema(&schema).translated_description);
    }
}
