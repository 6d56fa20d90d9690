//! Best-effort description translation.
//!
//! Translation is an enrichment, never a requirement: any failure falls back
//! to the original text so a flaky translation service cannot abort or degrade
//! a sync run beyond losing the translation itself.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Deserialize;
use url::Url;

use crate::batch::map_batched;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpError, HttpMethod, HttpRequest, HttpTransport};
use crate::sync::types::{TRANSLATE_BATCH_PAUSE_MS, TRANSLATE_BATCH_SIZE};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// MyMemory translation endpoint (no auth).
pub const TRANSLATE_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

/// Language pair requested from the service.
pub const TRANSLATE_LANG_PAIR: &str = "en|zh";

/// Longest input sent to the service; longer text is cut to this prefix, so
/// only the prefix gets translated.
pub const TRANSLATE_INPUT_LIMIT: usize = 500;

/// English-to-Chinese translator over the MyMemory API.
#[derive(Clone)]
pub struct Translator {
    transport: Arc<dyn HttpTransport>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "responseStatus")]
    status: i64,
    #[serde(rename = "responseData")]
    data: Option<TranslateData>,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl Translator {
    pub fn new() -> Result<Self, HttpError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Translate one text to Chinese.
    ///
    /// Empty or whitespace-only input returns an empty string without a
    /// network call. On any failure the original text comes back unchanged.
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let input: String = if text.chars().count() > TRANSLATE_INPUT_LIMIT {
            text.chars().take(TRANSLATE_INPUT_LIMIT).collect()
        } else {
            text.to_string()
        };

        match self.request(&input).await {
            Some(translated) => translated,
            None => {
                tracing::warn!(
                    text = %snippet(text),
                    "Translation failed, keeping original text"
                );
                text.to_string()
            }
        }
    }

    async fn request(&self, text: &str) -> Option<String> {
        let url = request_url(text);
        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "stargazer".to_string()),
            ],
            body: Vec::new(),
        };

        let response = self.transport.send(request).await.ok()?;
        if response.status != 200 {
            return None;
        }

        let payload: TranslateResponse = serde_json::from_slice(&response.body).ok()?;
        if payload.status != 200 {
            return None;
        }

        payload
            .data
            .and_then(|d| d.translated_text)
            .filter(|t| !t.is_empty())
    }

    /// Translate many texts, preserving input order and length.
    ///
    /// Output position `i` always corresponds to input position `i`, so the
    /// caller can zip results back onto the source list by index. Runs in
    /// batches of [`TRANSLATE_BATCH_SIZE`] with a fixed pause between batches.
    pub async fn translate_batch(
        &self,
        texts: Vec<String>,
        on_progress: Option<&ProgressCallback>,
    ) -> Vec<String> {
        let total = texts.len();
        emit(on_progress, SyncProgress::TranslatingDescriptions { total });

        let translator = self.clone();
        let mut done = 0usize;

        map_batched(
            texts,
            TRANSLATE_BATCH_SIZE,
            StdDuration::from_millis(TRANSLATE_BATCH_PAUSE_MS),
            move |text| {
                let translator = translator.clone();
                async move { translator.translate(&text).await }
            },
            |_| {
                done += 1;
                emit(on_progress, SyncProgress::TranslatedBatch { done, total });
            },
        )
        .await
    }
}

fn request_url(text: &str) -> String {
    // TRANSLATE_ENDPOINT is a valid base, so parsing can only be fed bad input
    // via `text`, which the serializer escapes.
    Url::parse_with_params(
        TRANSLATE_ENDPOINT,
        &[("q", text), ("langpair", TRANSLATE_LANG_PAIR)],
    )
    .map(|u| u.to_string())
    .unwrap_or_else(|_| TRANSLATE_ENDPOINT.to_string())
}

fn snippet(text: &str) -> String {
    let cut: String = text.chars().take(50).collect();
    if cut.len() < text.len() {
        format!("{cut}...")
    } else {
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use serde_json::json;

    fn translator(transport: &MockTransport) -> Translator {
        Translator::with_transport(Arc::new(transport.clone()))
    }

    fn ok_response(translated: &str) -> serde_json::Value {
        json!({
            "responseStatus": 200,
            "responseData": { "translatedText": translated }
        })
    }

    #[tokio::test]
    async fn empty_and_whitespace_input_skip_the_network() {
        let transport = MockTransport::new();
        let translator = translator(&transport);

        assert_eq!(translator.translate("").await, "");
        assert_eq!(translator.translate("   ").await, "");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn successful_translation_returns_the_service_text() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            request_url("a fast web framework"),
            200,
            &ok_response("一个快速的网络框架"),
        );

        let result = translator(&transport).translate("a fast web framework").await;
        assert_eq!(result, "一个快速的网络框架");
    }

    #[tokio::test]
    async fn long_input_is_truncated_before_the_call() {
        let long: String = "a".repeat(600);
        let prefix: String = "a".repeat(TRANSLATE_INPUT_LIMIT);

        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            request_url(&prefix),
            200,
            &ok_response("翻译"),
        );

        let result = translator(&transport).translate(&long).await;
        assert_eq!(result, "翻译");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn http_failure_falls_back_to_the_original_text() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            request_url("hello"),
            500,
            &json!({"responseStatus": 500}),
        );

        assert_eq!(translator(&transport).translate("hello").await, "hello");
    }

    #[tokio::test]
    async fn service_level_failure_falls_back_to_the_original_text() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            request_url("hello"),
            200,
            &json!({"responseStatus": 403, "responseDetails": "invalid pair"}),
        );

        assert_eq!(translator(&transport).translate("hello").await, "hello");
    }

    #[tokio::test]
    async fn malformed_payload_falls_back_to_the_original_text() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            request_url("hello"),
            crate::http::HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"not json".to_vec(),
            },
        );

        assert_eq!(translator(&transport).translate("hello").await, "hello");
    }

    #[tokio::test]
    async fn missing_transport_response_falls_back_to_the_original_text() {
        let transport = MockTransport::new();
        assert_eq!(translator(&transport).translate("hello").await, "hello");
    }

    #[tokio::test]
    async fn truncated_input_failure_returns_the_full_original() {
        let long: String = "b".repeat(700);
        let transport = MockTransport::new();

        let result = translator(&transport).translate(&long).await;
        assert_eq!(result, long);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_translation_preserves_order_and_length() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            request_url("one"),
            200,
            &ok_response("一"),
        );
        // "two" has no mock response and falls back to the original.
        transport.push_json(
            HttpMethod::Get,
            request_url("three"),
            200,
            &ok_response("三"),
        );

        let texts = vec![
            "one".to_string(),
            "two".to_string(),
            "".to_string(),
            "three".to_string(),
        ];
        let results = translator(&transport).translate_batch(texts, None).await;

        assert_eq!(results, vec!["一", "two", "", "三"]);
    }

    #[test]
    fn request_url_encodes_the_query() {
        let url = request_url("hello world & more");
        assert!(url.starts_with(TRANSLATE_ENDPOINT));
        assert!(url.contains("langpair=en%7Czh") || url.contains("langpair=en|zh"));
        assert!(!url.contains("hello world"));
    }
}
