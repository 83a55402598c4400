//! Router-level tests. Every CRUD scenario runs once per session mode; the
//! blocking mode needs a multi-threaded runtime.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use ormctl_server::{build_router, open_state, ServerConfig, SessionMode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    async fn new(mode: SessionMode) -> Self {
        Self::with_pool(mode, 2).await
    }

    async fn with_pool(mode: SessionMode, max_connections: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            mode,
            items_db: dir.path().join("items.db"),
            relations_db: dir.path().join("relation.db"),
            max_connections,
            stream_interval_ms: 0,
            ..Default::default()
        };
        let state = open_state(&config).await.unwrap();
        Self {
            router: build_router(state, false),
            _dir: dir,
        }
    }

    async fn raw(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// POST a form-encoded body; returns status, headers and body text
    async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, text) = self.raw(method, uri, body).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        (status, value)
    }

    async fn create_item(&self, name: &str) -> Value {
        let (status, item) = self
            .call(
                "POST",
                "/itemscreate",
                Some(json!({"name": name, "description": format!("{name} description")})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{item}");
        item
    }

    async fn create_request(&self, name: &str) -> i64 {
        let (status, request) = self
            .call("POST", "/requests/", Some(json!({"name": name, "group": "ops"})))
            .await;
        assert_eq!(status, StatusCode::OK, "{request}");
        request["id"].as_i64().unwrap()
    }

    async fn create_training(&self, title: &str) -> i64 {
        let (status, training) = self
            .call("POST", "/trainings/", Some(json!({"title": title, "duration": 30})))
            .await;
        assert_eq!(status, StatusCode::OK, "{training}");
        training["id"].as_i64().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

async fn item_create_and_list(mode: SessionMode) {
    let app = TestApp::new(mode).await;

    let item = app.create_item("lamp").await;
    assert_eq!(item["name"], "lamp");
    assert_eq!(item["is_active"], true);
    assert!(item["id"].as_i64().unwrap() > 0);
    assert!(item["created_at"].as_str().unwrap().contains('T'));

    // alias route
    let (status, second) = app
        .call("POST", "/items", Some(json!({"name": "desk", "description": "oak"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = app.call("GET", "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![item["id"].as_i64().unwrap(), second["id"].as_i64().unwrap()]);

    let (status, fetched) = app.call("GET", &format!("/items/{}", item["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, item);
}

async fn item_create_validation(mode: SessionMode) {
    let app = TestApp::new(mode).await;

    let (status, body) = app
        .call("POST", "/itemscreate", Some(json!({"name": "no description"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = app
        .call("POST", "/itemscreate", Some(json!({"name": "   ", "description": "x"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.call("GET", "/items/not-a-number", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, list) = app.call("GET", "/items", None).await;
    assert_eq!(list, json!([]));
}

async fn item_partial_update(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let item = app.create_item("lamp").await;
    let uri = format!("/items/{}", item["id"]);

    let (status, updated) = app.call("PUT", &uri, Some(json!({"is_active": false}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["name"], "lamp");
    assert_eq!(updated["description"], item["description"]);
    assert_eq!(updated["created_at"], item["created_at"]);

    let (status, updated) = app.call("PUT", &uri, Some(json!({"description": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], Value::Null);

    let (status, body) = app.call("PUT", &uri, Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "name cannot be null");

    let (status, body) = app.call("PUT", "/items/9999", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    // empty body changes nothing but still checks existence
    let (status, same) = app.call("PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["name"], "lamp");
    let (status, _) = app.call("PUT", "/items/9999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn item_replace_drops_nulls(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let item = app.create_item("lamp").await;
    let uri = format!("/items/{}/replace", item["id"]);

    let (status, updated) = app
        .call("PUT", &uri, Some(json!({"name": null, "description": "brass"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "lamp");
    assert_eq!(updated["description"], "brass");

    let (status, unchanged) = app.call("PUT", &uri, Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);

    let (status, _) = app
        .call("PUT", "/items/9999/replace", Some(json!({"name": "x"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn bulk_update_all_or_nothing(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let first = app.create_item("one").await["id"].as_i64().unwrap();
    let second = app.create_item("two").await["id"].as_i64().unwrap();

    let body = json!({
        first.to_string(): {"name": "renamed"},
        "9998": {"name": "ghost"},
        "9999": {"is_active": false},
    });
    let (status, err) = app.call("PATCH", "/items/bulk-update", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["ids"], json!([9998, 9999]));
    assert_eq!(err["message"], "Items with ids [9998, 9999] not found");

    // nothing from the failed batch was committed
    let (_, item) = app.call("GET", &format!("/items/{first}"), None).await;
    assert_eq!(item["name"], "one");

    let body = json!({
        first.to_string(): {"name": "renamed"},
        second.to_string(): {"is_active": false},
    });
    let (status, summary) = app.call("PATCH", "/items/bulk-update", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["message"], "Successfully updated 2 items");
    assert_eq!(summary["updated_items"][0]["name"], "renamed");
    assert_eq!(summary["updated_items"][1]["is_active"], false);

    let (status, _) = app
        .call("PATCH", "/items/bulk-update", Some(json!({"abc": {}})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

async fn item_delete_and_id_reuse(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let first = app.create_item("temp").await["id"].as_i64().unwrap();

    let (status, body) = app.call("DELETE", &format!("/items/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Item {first} deleted successfully"));

    let (status, _) = app.call("DELETE", &format!("/items/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call("GET", &format!("/items/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let next = app.create_item("again").await["id"].as_i64().unwrap();
    assert!(next > first, "ids are never reused");
}

// ---------------------------------------------------------------------------
// Requests and trainings
// ---------------------------------------------------------------------------

async fn association_lifecycle(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let request = app.create_request("onboarding").await;
    let lonely = app.create_request("no trainings").await;
    let safety = app.create_training("Safety").await;
    let forklift = app.create_training("Forklift").await;

    let link = |r: i64, t: i64| format!("/requests/{r}/trainings/{t}");

    let (status, body) = app.call("POST", &link(request, forklift), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Association created successfully");
    let (status, _) = app.call("POST", &link(request, safety), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call("POST", &link(request, safety), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = app.call("POST", &link(9999, safety), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Request not found");
    let (status, body) = app.call("POST", &link(request, 9999), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Training not found");

    let (status, list) = app.call("GET", "/requests/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        list,
        json!([
            {
                "id": request,
                "name": "onboarding",
                "trainings": [
                    {"id": safety, "title": "Safety"},
                    {"id": forklift, "title": "Forklift"},
                ]
            },
            {"id": lonely, "name": "no trainings", "trainings": []},
        ])
    );

    let (status, reverse) = app
        .call("GET", &format!("/trainings/{safety}/requests"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reverse, json!([{"id": request, "name": "onboarding"}]));

    let (status, remaining) = app.call("DELETE", &link(request, safety), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(remaining["trainings"], json!([{"id": forklift, "title": "Forklift"}]));

    // unlinking again, or an unknown training, changes nothing
    let (status, again) = app.call("DELETE", &link(request, safety), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, remaining);
    let (status, _) = app.call("DELETE", &link(request, 9999), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("DELETE", &link(9999, safety), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn training_delete_cascades(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let first = app.create_request("first").await;
    let second = app.create_request("second").await;
    let training = app.create_training("Safety").await;

    for request in [first, second] {
        let (status, _) = app
            .call("POST", &format!("/requests/{request}/trainings/{training}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app.call("DELETE", &format!("/trainings/{training}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.call("GET", "/requests", None).await;
    for request in list.as_array().unwrap() {
        assert_eq!(request["trainings"], json!([]));
    }

    let (status, _) = app.call("DELETE", &format!("/requests/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.call("GET", "/requests", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

async fn request_and_training_updates(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let request = app.create_request("onboarding").await;
    let training = app.create_training("Safety").await;

    let (status, updated) = app
        .call("PUT", &format!("/requests/{request}"), Some(json!({"group": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["group"], Value::Null);
    assert_eq!(updated["name"], "onboarding");

    let (status, updated) = app
        .call("PUT", &format!("/trainings/{training}"), Some(json!({"duration": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["duration"], Value::Null);

    let (status, _) = app
        .call("PUT", &format!("/trainings/{training}"), Some(json!({"title": null})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .call("POST", "/trainings", Some(json!({"title": "Negative", "duration": -1})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, one) = app.call("GET", &format!("/trainings/{training}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["title"], "Safety");

    let (status, all) = app.call("GET", "/trainings/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = app.call("GET", "/requests/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn sample_unlinks_fixed_pair(mode: SessionMode) {
    let app = TestApp::new(mode).await;

    let (status, _) = app.call("GET", "/sample/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = app.create_request("first").await;
    let trainings = [
        app.create_training("one").await,
        app.create_training("two").await,
        app.create_training("three").await,
    ];
    assert_eq!((request, trainings[2]), (1, 3));

    for training in [2, 3] {
        let (status, _) = app
            .call("POST", &format!("/requests/1/trainings/{training}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.call("GET", "/sample/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trainings"], json!([{"id": 2, "title": "two"}]));
}

async fn health_reports_mode(mode: SessionMode) {
    let app = TestApp::new(mode).await;
    let (status, body) = app.call("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mode"], mode.as_str());
}

/// Writers that read before writing must queue on the lock, not fail with a
/// stale snapshot.
async fn concurrent_links_all_succeed(mode: SessionMode) {
    let app = std::sync::Arc::new(TestApp::with_pool(mode, 5).await);
    let request = app.create_request("onboarding").await;
    let mut trainings = Vec::new();
    for i in 0..20 {
        trainings.push(app.create_training(&format!("training {i}")).await);
    }

    let tasks: Vec<_> = trainings
        .iter()
        .map(|&training| {
            let app = app.clone();
            tokio::spawn(async move {
                app.call("POST", &format!("/requests/{request}/trainings/{training}"), None)
                    .await
            })
        })
        .collect();

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{mode}: {body}");
    }

    let (_, linked) = app.call("GET", &format!("/requests/{request}"), None).await;
    assert_eq!(linked["trainings"].as_array().unwrap().len(), 20);

    // unlinking concurrently goes through the same write path
    let tasks: Vec<_> = trainings
        .iter()
        .map(|&training| {
            let app = app.clone();
            tokio::spawn(async move {
                app.call("DELETE", &format!("/requests/{request}/trainings/{training}"), None)
                    .await
            })
        })
        .collect();

    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{mode}: {body}");
    }

    let (_, linked) = app.call("GET", &format!("/requests/{request}"), None).await;
    assert_eq!(linked["trainings"], json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_links_async_mode() {
    concurrent_links_all_succeed(SessionMode::Async).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_links_blocking_mode() {
    concurrent_links_all_succeed(SessionMode::Blocking).await;
}

macro_rules! in_both_modes {
    ($($name:ident),* $(,)?) => {
        mod async_mode {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(SessionMode::Async).await;
                }
            )*
        }

        mod blocking_mode {
            use super::*;
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
                async fn $name() {
                    super::$name(SessionMode::Blocking).await;
                }
            )*
        }
    };
}

in_both_modes!(
    item_create_and_list,
    item_create_validation,
    item_partial_update,
    item_replace_drops_nulls,
    bulk_update_all_or_nothing,
    item_delete_and_id_reuse,
    association_lifecycle,
    training_delete_cascades,
    request_and_training_updates,
    sample_unlinks_fixed_pair,
    health_reports_mode,
);

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_kinds_emit_five_chunks() {
    let app = TestApp::new(SessionMode::Async).await;

    let (status, content_type, body) = app.raw("GET", "/stream?stream_type=sse", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/event-stream");
    let events: Vec<&str> = body.split("\n\n").filter(|e| !e.is_empty()).collect();
    assert_eq!(events.len(), 5);
    for (i, event) in events.iter().enumerate() {
        let payload: Value = serde_json::from_str(event.strip_prefix("data: ").unwrap()).unwrap();
        assert_eq!(payload["message"], format!("SSE message {i}"));
        assert!(payload["timestamp"].as_f64().unwrap() > 0.0);
    }

    let (_, content_type, body) = app.raw("GET", "/stream?stream_type=json", None).await;
    assert_eq!(content_type, "application/x-ndjson");
    let lines: Vec<Value> = body
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[4]["message"], "JSON message 4");

    let (_, content_type, body) = app.raw("GET", "/stream?stream_type=bytes", None).await;
    assert_eq!(content_type, "application/octet-stream");
    let expected: String = (0..5).map(|i| format!("Bytes chunk {i}")).collect();
    assert_eq!(body, expected);

    let (_, content_type, body) = app.raw("GET", "/stream?stream_type=iterator", None).await;
    assert_eq!(content_type, "text/plain");
    let expected: String = (0..5).map(|i| format!("Iterator message {i}")).collect();
    assert_eq!(body, expected);

    let (_, content_type, body) = app
        .raw("GET", "/stream?stream_type=async_iterator", None)
        .await;
    assert_eq!(content_type, "text/plain");
    let expected: String = (0..5).map(|i| format!("Async Iterator message {i}")).collect();
    assert_eq!(body, expected);
}

#[tokio::test]
async fn stream_rejects_unknown_kind() {
    let app = TestApp::new(SessionMode::Async).await;

    let (status, body) = app.call("GET", "/stream?stream_type=xml", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = app.call("GET", "/stream", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sse_is_not_cached() {
    let app = TestApp::new(SessionMode::Async).await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/stream?stream_type=sse")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
}

// ---------------------------------------------------------------------------
// Search, form submission and error responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_accepts_one_or_many_terms() {
    let app = TestApp::new(SessionMode::Async).await;

    let (status, body) = app.call("GET", "/search?query=rust", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [{"query": "rust", "filter_type": null, "page": 1}],
            "message": "Search results",
            "status": true
        })
    );

    let (status, body) = app
        .call("GET", "/search?query=a&query=b&filter_type=location&page=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"][0],
        json!({"query": ["a", "b"], "filter_type": "location", "page": 2})
    );
}

#[tokio::test]
async fn search_rejects_bad_parameters() {
    let app = TestApp::new(SessionMode::Async).await;

    for uri in [
        "/search",
        "/search?page=2",
        "/search?query=a&page=0",
        "/search?query=a&page=x",
        "/search?query=a&filter_type=color",
    ] {
        let (status, body) = app.call("GET", uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"], "validation_error", "{uri}");
    }
}

#[tokio::test]
async fn submit_echoes_validated_user() {
    let app = TestApp::new(SessionMode::Async).await;

    let (status, headers, body) = app
        .post_form("/submit", "email=ada%40Example.com&username=ada99&website=https%3A%2F%2Fada.dev")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/json"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"user": {"email": "ada@example.com", "username": "ada99", "website": "https://ada.dev/"}})
    );

    let (status, headers, body) = app
        .post_form("/submit", "email=ada%40example.com&username=ada99&website=&response_type=text")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
    assert!(body.contains("\n  \"user\""));
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["user"]["website"], Value::Null);

    let (status, headers, _) = app
        .post_form("/submit", "email=ada%40example.com&username=ada99&response_type=file")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"response.txt\""
    );
}

#[tokio::test]
async fn submit_rejects_invalid_fields() {
    let app = TestApp::new(SessionMode::Async).await;

    for form in [
        "username=ada99",
        "email=not-an-email&username=ada99",
        "email=ada%40example.com&username=ab",
        "email=ada%40example.com&username=ada_99",
        "email=ada%40example.com&username=ada99&website=ftp%3A%2F%2Fada.dev",
        "email=ada%40example.com&username=ada99&response_type=xml",
    ] {
        let (status, _, body) = app.post_form("/submit", form).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{form}: {body}");
    }

    // JSON is not accepted where a form is expected
    let (status, body) = app
        .call("POST", "/submit", Some(json!({"email": "ada@example.com", "username": "ada99"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn error_demo_kinds() {
    let app = TestApp::new(SessionMode::Async).await;

    let (status, body) = app.call("GET", "/error-demo?error_type=client", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": {"message": "Item not found", "status": false}}));

    let (status, body) = app.call("GET", "/error-demo?error_type=server", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"]["message"], "Server error demonstration");

    let (status, body) = app.call("GET", "/error-demo?error_type=custom", None).await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body, json!({"message": "I'm a teapot!"}));

    let (status, _) = app.call("GET", "/error-demo?error_type=other", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = app.call("GET", "/error-demo", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
