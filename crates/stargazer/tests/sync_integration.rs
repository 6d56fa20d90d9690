//! End-to-end tests for the sync pipeline.
//!
//! These drive `perform_sync` against an in-memory transport, covering the
//! main flows: empty source, upsert reconciliation, wipe-and-recreate,
//! translation enrichment, and write-failure abort semantics.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use stargazer::github::client::GITHUB_API;
use stargazer::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use stargazer::notion::client::NOTION_API;
use stargazer::sync::{ReconcileStrategy, SyncOptions, perform_sync};
use stargazer::{GitHubClient, NotionClient, Translator};

/// Maximum time any sync run should take in tests. If exceeded, there's
/// likely a hang.
const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

const DB: &str = "db1";

// ─── Test transport ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct TestTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    routes: HashMap<(HttpMethod, String), VecDeque<HttpResponse>>,
    defaults: HashMap<(HttpMethod, String), HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl TestTransport {
    fn new() -> Self {
        Self::default()
    }

    fn json_response(status: u16, body: &Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string().into_bytes(),
        }
    }

    fn push_json(&self, method: HttpMethod, url: impl Into<String>, status: u16, body: &Value) {
        self.inner
            .lock()
            .unwrap()
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(Self::json_response(status, body));
    }

    fn default_json(&self, method: HttpMethod, url: impl Into<String>, status: u16, body: &Value) {
        self.inner
            .lock()
            .unwrap()
            .defaults
            .insert((method, url.into()), Self::json_response(status, body));
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl HttpTransport for TestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (request.method, request.url.clone());
        inner.requests.push(request);

        if let Some(resp) = inner.routes.get_mut(&key).and_then(|q| q.pop_front()) {
            return Ok(resp);
        }
        match inner.defaults.get(&key) {
            Some(resp) => Ok(resp.clone()),
            None => Err(HttpError::Transport(format!(
                "no response for {} {}",
                key.0.as_str(),
                key.1
            ))),
        }
    }
}

// ─── Fixtures ──────────────────────────────────────────────────────────────────

fn clients(transport: &TestTransport) -> (GitHubClient, NotionClient, Translator) {
    let transport: Arc<dyn HttpTransport> = Arc::new(transport.clone());
    (
        GitHubClient::with_transport("ghp_test", Arc::clone(&transport)),
        NotionClient::with_transport("secret_test", Arc::clone(&transport)),
        Translator::with_transport(transport),
    )
}

fn starred_url(page: u32) -> String {
    format!("{GITHUB_API}/user/starred?per_page=100&page={page}&sort=created&direction=desc")
}

fn starred_item(full_name: &str, description: Option<&str>) -> Value {
    let name = full_name.split('/').next_back().unwrap();
    json!({
        "starred_at": "2024-03-01T12:00:00Z",
        "repo": {
            "id": 1,
            "name": name,
            "full_name": full_name,
            "description": description,
            "html_url": format!("https://github.com/{full_name}"),
            "language": "Rust",
            "stargazers_count": 10,
            "updated_at": "2024-02-01T00:00:00Z"
        }
    })
}

fn latest_release_url(full_name: &str) -> String {
    format!("{GITHUB_API}/repos/{full_name}/releases/latest")
}

fn stable_release(tag: &str) -> Value {
    json!({
        "id": 5,
        "tag_name": tag,
        "name": format!("Release {tag}"),
        "body": "release notes",
        "html_url": format!("https://github.com/x/y/releases/tag/{tag}"),
        "published_at": "2024-04-01T00:00:00Z",
        "created_at": "2024-03-30T00:00:00Z",
        "prerelease": false
    })
}

fn schema_url() -> String {
    format!("{NOTION_API}/databases/{DB}")
}

fn schema(with_translated: bool) -> Value {
    let mut properties = json!({
        "Name": { "id": "title", "type": "title" },
        "Description": { "id": "desc", "type": "rich_text" },
        "URL": { "id": "url", "type": "url" }
    });
    if with_translated {
        properties["DescriptionZh"] = json!({ "id": "zh", "type": "rich_text" });
    }
    json!({ "id": DB, "properties": properties })
}

fn query_url() -> String {
    format!("{NOTION_API}/databases/{DB}/query")
}

fn existing_page(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "archived": false,
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [{ "type": "text", "plain_text": name }]
            }
        }
    })
}

fn query_result(pages: Vec<Value>) -> Value {
    json!({ "results": pages, "has_more": false, "next_cursor": null })
}

fn pages_url() -> String {
    format!("{NOTION_API}/pages")
}

fn page_url(id: &str) -> String {
    format!("{NOTION_API}/pages/{id}")
}

fn not_found() -> Value {
    json!({ "message": "Not Found" })
}

fn no_translate_options() -> SyncOptions {
    SyncOptions {
        translate: false,
        ..SyncOptions::default()
    }
}

fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

// ─── Scenarios ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_star_list_never_touches_the_destination() {
    let transport = TestTransport::new();
    transport.push_json(HttpMethod::Get, schema_url(), 200, &schema(false));
    transport.push_json(HttpMethod::Get, starred_url(1), 200, &json!([]));

    let (github, notion, translator) = clients(&transport);
    let outcome = tokio::time::timeout(
        SYNC_TIMEOUT,
        perform_sync(
            &github,
            &notion,
            &translator,
            DB,
            &no_translate_options(),
            None,
        ),
    )
    .await
    .expect("sync timed out")
    .expect("sync should succeed");

    assert_eq!(outcome.fetched, 0);
    assert_eq!(outcome.created + outcome.updated + outcome.cleared, 0);

    // No destination row was listed, written, or archived.
    let requests = transport.requests();
    assert!(
        requests
            .iter()
            .all(|r| !r.url.contains("/query") && !r.url.contains("/pages"))
    );
}

#[tokio::test]
async fn upsert_run_reconciles_and_enriches() {
    let transport = TestTransport::new();
    transport.push_json(HttpMethod::Get, schema_url(), 200, &schema(false));
    transport.push_json(
        HttpMethod::Get,
        starred_url(1),
        200,
        &json!([
            starred_item("a/one", Some("first tool")),
            starred_item("c/three", Some("third tool")),
        ]),
    );
    transport.push_json(
        HttpMethod::Post,
        query_url(),
        200,
        &query_result(vec![
            existing_page("p1", "a/one"),
            existing_page("p2", "b/two"),
        ]),
    );
    // a/one has no releases at all; c/three has a stable one.
    transport.push_json(HttpMethod::Get, latest_release_url("a/one"), 404, &not_found());
    transport.push_json(
        HttpMethod::Get,
        latest_release_url("c/three"),
        200,
        &stable_release("v2.0.0"),
    );
    transport.push_json(HttpMethod::Patch, page_url("p1"), 200, &json!({"id": "p1"}));
    transport.push_json(
        HttpMethod::Post,
        pages_url(),
        200,
        &json!({"id": "new-page", "properties": {}}),
    );

    let (github, notion, translator) = clients(&transport);
    let outcome = tokio::time::timeout(
        SYNC_TIMEOUT,
        perform_sync(
            &github,
            &notion,
            &translator,
            DB,
            &no_translate_options(),
            None,
        ),
    )
    .await
    .expect("sync timed out")
    .expect("sync should succeed");

    assert_eq!(outcome.fetched, 2);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.with_release, 1);
    assert_eq!(outcome.cleared, 0);

    let requests = transport.requests();

    // The row known by name was updated in place and shows "No releases".
    let update = requests
        .iter()
        .find(|r| r.method == HttpMethod::Patch && r.url == page_url("p1"))
        .expect("a/one should be updated");
    let update_body = body_json(update);
    assert_eq!(
        update_body["properties"]["LatestRelease"]["rich_text"][0]["text"]["content"],
        "No releases"
    );
    assert!(update_body["properties"]["ReleasePublishedAt"].is_null());

    // The unknown repo was created with its release attached.
    let create = requests
        .iter()
        .find(|r| r.method == HttpMethod::Post && r.url == pages_url())
        .expect("c/three should be created");
    let create_body = body_json(create);
    assert_eq!(
        create_body["properties"]["Name"]["title"][0]["text"]["content"],
        "c/three"
    );
    assert_eq!(
        create_body["properties"]["LatestRelease"]["rich_text"][0]["text"]["content"],
        "Release v2.0.0"
    );

    // The stale remote row "b/two" was left untouched.
    assert!(requests.iter().all(|r| !r.url.contains("/pages/p2")));
}

#[tokio::test]
async fn wipe_strategy_archives_everything_then_recreates() {
    let transport = TestTransport::new();
    transport.push_json(HttpMethod::Get, schema_url(), 200, &schema(false));
    transport.push_json(
        HttpMethod::Get,
        starred_url(1),
        200,
        &json!([
            starred_item("a/one", None),
            starred_item("b/two", None),
        ]),
    );
    transport.push_json(
        HttpMethod::Post,
        query_url(),
        200,
        &query_result(vec![
            existing_page("p1", "a/one"),
            existing_page("p2", "b/two"),
        ]),
    );
    transport.push_json(HttpMethod::Patch, page_url("p1"), 200, &json!({"id": "p1"}));
    transport.push_json(HttpMethod::Patch, page_url("p2"), 200, &json!({"id": "p2"}));
    transport.default_json(HttpMethod::Get, latest_release_url("a/one"), 404, &not_found());
    transport.default_json(HttpMethod::Get, latest_release_url("b/two"), 404, &not_found());
    transport.default_json(
        HttpMethod::Post,
        pages_url(),
        200,
        &json!({"id": "fresh", "properties": {}}),
    );

    let options = SyncOptions {
        strategy: ReconcileStrategy::WipeAndRecreate,
        translate: false,
        ..SyncOptions::default()
    };

    let (github, notion, translator) = clients(&transport);
    let outcome = tokio::time::timeout(
        SYNC_TIMEOUT,
        perform_sync(&github, &notion, &translator, DB, &options, None),
    )
    .await
    .expect("sync timed out")
    .expect("sync should succeed");

    assert_eq!(outcome.cleared, 2);
    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.updated, 0);

    let requests = transport.requests();

    // Both pre-existing pages were archived.
    let archived: Vec<&HttpRequest> = requests
        .iter()
        .filter(|r| r.method == HttpMethod::Patch)
        .collect();
    assert_eq!(archived.len(), 2);
    assert!(archived.iter().all(|r| body_json(r)["archived"] == true));

    // Every row was recreated, none updated.
    let creates = requests
        .iter()
        .filter(|r| r.method == HttpMethod::Post && r.url == pages_url())
        .count();
    assert_eq!(creates, 2);
}

#[tokio::test]
async fn translation_enriches_rows_when_the_schema_supports_it() {
    let transport = TestTransport::new();
    transport.push_json(HttpMethod::Get, schema_url(), 200, &schema(true));
    transport.push_json(
        HttpMethod::Get,
        starred_url(1),
        200,
        &json!([starred_item("a/one", Some("fast tool"))]),
    );
    transport.push_json(HttpMethod::Post, query_url(), 200, &query_result(vec![]));
    transport.push_json(HttpMethod::Get, latest_release_url("a/one"), 404, &not_found());

    let translate_url = url::Url::parse_with_params(
        "https://api.mymemory.translated.net/get",
        &[("q", "fast tool"), ("langpair", "en|zh")],
    )
    .unwrap()
    .to_string();
    transport.push_json(
        HttpMethod::Get,
        translate_url,
        200,
        &json!({
            "responseStatus": 200,
            "responseData": { "translatedText": "快速工具" }
        }),
    );

    transport.push_json(
        HttpMethod::Post,
        pages_url(),
        200,
        &json!({"id": "fresh", "properties": {}}),
    );

    let (github, notion, translator) = clients(&transport);
    let outcome = tokio::time::timeout(
        SYNC_TIMEOUT,
        perform_sync(
            &github,
            &notion,
            &translator,
            DB,
            &SyncOptions::default(),
            None,
        ),
    )
    .await
    .expect("sync timed out")
    .expect("sync should succeed");

    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.translated, 1);

    let requests = transport.requests();
    let create = requests
        .iter()
        .find(|r| r.method == HttpMethod::Post && r.url == pages_url())
        .expect("row should be created");
    let body = body_json(create);
    assert_eq!(
        body["properties"]["DescriptionZh"]["rich_text"][0]["text"]["content"],
        "快速工具"
    );
}

#[tokio::test]
async fn write_failure_aborts_after_the_failing_batch_settles() {
    let transport = TestTransport::new();
    transport.push_json(HttpMethod::Get, schema_url(), 200, &schema(false));

    let items: Vec<Value> = (0..7)
        .map(|n| starred_item(&format!("o/r{n}"), None))
        .collect();
    transport.push_json(HttpMethod::Get, starred_url(1), 200, &Value::Array(items));
    transport.push_json(HttpMethod::Post, query_url(), 200, &query_result(vec![]));
    for n in 0..7 {
        transport.default_json(
            HttpMethod::Get,
            latest_release_url(&format!("o/r{n}")),
            404,
            &not_found(),
        );
    }
    // Every create fails.
    transport.default_json(
        HttpMethod::Post,
        pages_url(),
        500,
        &json!({"object": "error", "status": 500, "code": "internal_server_error", "message": "boom"}),
    );

    let (github, notion, translator) = clients(&transport);
    let result = tokio::time::timeout(
        SYNC_TIMEOUT,
        perform_sync(
            &github,
            &notion,
            &translator,
            DB,
            &no_translate_options(),
            None,
        ),
    )
    .await
    .expect("sync timed out");

    assert!(result.is_err());

    // Only the first batch of writes was attempted; the second never started.
    let creates = transport
        .requests()
        .iter()
        .filter(|r| r.method == HttpMethod::Post && r.url == pages_url())
        .count();
    assert_eq!(creates, 5);
}
