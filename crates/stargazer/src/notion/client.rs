//! Notion API client creation and request plumbing.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::de::DeserializeOwned;

use super::error::NotionError;
use super::types::{DatabaseSchema, ErrorPayload};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpHeaders, HttpMethod, HttpRequest, HttpTransport};

/// Base URL of the Notion REST API.
pub const NOTION_API: &str = "https://api.notion.com/v1";

/// Pinned API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion API client.
///
/// A bearer-token client over [`HttpTransport`]. Error bodies are decoded so
/// the Notion error code travels with the error.
#[derive(Clone)]
pub struct NotionClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
}

impl NotionClient {
    /// Create a new Notion client from an integration token.
    pub fn new(token: &str) -> Result<Self, NotionError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| NotionError::Http(e.to_string()))?;
        Ok(Self::with_transport(token, Arc::new(transport)))
    }

    pub fn with_transport(token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token: token.to_string(),
        }
    }

    fn headers(&self) -> HttpHeaders {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("Notion-Version".to_string(), NOTION_VERSION.to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), "stargazer".to_string()),
        ]
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, NotionError> {
        let request = HttpRequest {
            method,
            url: format!("{NOTION_API}{path}"),
            headers: self.headers(),
            body: body.map(|b| b.to_string().into_bytes()).unwrap_or_default(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| NotionError::Http(e.to_string()))?;

        if (200..300).contains(&response.status) {
            return Ok(response.body);
        }

        let payload: ErrorPayload = serde_json::from_slice(&response.body).unwrap_or_default();
        Err(NotionError::Api {
            status: response.status,
            code: payload.code.unwrap_or_else(|| "unknown".to_string()),
            message: payload
                .message
                .unwrap_or_else(|| String::from_utf8_lossy(&response.body).trim().to_string()),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NotionError> {
        let body = self.send(HttpMethod::Get, path, None).await?;
        serde_json::from_slice(&body).map_err(NotionError::Json)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, NotionError> {
        let response = self.send(HttpMethod::Post, path, Some(body)).await?;
        serde_json::from_slice(&response).map_err(NotionError::Json)
    }

    pub(crate) async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(), NotionError> {
        self.send(HttpMethod::Patch, path, Some(body)).await?;
        Ok(())
    }

    /// Retrieve the database schema.
    ///
    /// Doubles as the startup access check: the `object_not_found` and
    /// `unauthorized` error codes are translated into actionable messages.
    pub async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseSchema, NotionError> {
        match self.get_json(&format!("/databases/{database_id}")).await {
            Ok(schema) => Ok(schema),
            Err(NotionError::Api { code, .. }) if code == "object_not_found" => {
                Err(NotionError::DatabaseNotFound)
            }
            Err(NotionError::Api { code, .. }) if code == "unauthorized" => {
                Err(NotionError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }
}
