//! Integration tests using mock HTTP server
//!
//! Tests the full flow: resource handle → pagination → HTTP client → mock API

use async_trait::async_trait;
use evalkit::http::Sleeper;
use evalkit::{Client, ClientConfig, ErrorKind, ListOptions};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

fn client_for(server: &MockServer) -> (Client, RecordingSleeper) {
    let config = ClientConfig::builder()
        .api_key("sk-integration")
        .base_url(server.uri())
        .build();
    let sleeper = RecordingSleeper::default();
    let client = Client::new(config).unwrap().with_sleeper(sleeper.clone());
    (client, sleeper)
}

fn objects(ids: &[&str]) -> Value {
    json!({ "objects": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>() })
}

async fn mount_project_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .and(header("Authorization", "Bearer sk-integration"))
        .and(query_param_is_missing("starting_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&["p1", "p2"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .and(query_param("starting_after", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&["p3", "p4"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .and(query_param("starting_after", "p4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&[])))
        .mount(server)
        .await;
}

fn ids(items: &[Value]) -> Vec<&str> {
    items.iter().filter_map(|item| item["id"].as_str()).collect()
}

// ============================================================================
// Pagination over HTTP
// ============================================================================

#[tokio::test]
async fn test_list_projects_across_pages() {
    let server = MockServer::start().await;
    mount_project_pages(&server).await;
    let (client, _) = client_for(&server);

    let projects = client
        .projects()
        .list(ListOptions::new().limit(2))
        .await
        .unwrap();

    assert_eq!(ids(&projects), vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_stream_stops_fetching_when_consumer_stops() {
    let server = MockServer::start().await;
    mount_project_pages(&server).await;
    let (client, _) = client_for(&server);

    let first: Vec<Value> = client
        .projects()
        .stream(ListOptions::new().limit(2))
        .into_stream()
        .take(2)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&first), vec!["p1", "p2"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_resume_from_cursor() {
    let server = MockServer::start().await;
    mount_project_pages(&server).await;
    let (client, _) = client_for(&server);

    let rest = client
        .projects()
        .list(ListOptions::new().limit(2).starting_after("p2"))
        .await
        .unwrap();

    assert_eq!(ids(&rest), vec!["p3", "p4"]);
}

#[tokio::test]
async fn test_concurrent_streams_share_client() {
    let server = MockServer::start().await;
    mount_project_pages(&server).await;
    let (client, _) = client_for(&server);

    let projects = client.projects();
    let (a, b) = tokio::join!(
        projects.list(ListOptions::new().limit(2)),
        projects.list(ListOptions::new().limit(2)),
    );

    assert_eq!(ids(&a.unwrap()), vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(ids(&b.unwrap()), vec!["p1", "p2", "p3", "p4"]);
}

#[tokio::test]
async fn test_retry_happens_beneath_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/dataset"))
        .and(query_param("starting_after", "d1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/dataset"))
        .and(query_param("starting_after", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&[])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/dataset"))
        .and(query_param_is_missing("starting_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&["d1"])))
        .mount(&server)
        .await;

    let (client, sleeper) = client_for(&server);
    let datasets = client.datasets().list(ListOptions::new()).await.unwrap();

    assert_eq!(ids(&datasets), vec!["d1"]);
    assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(1)]);
}

#[tokio::test]
async fn test_list_error_on_second_page_returns_error_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/function"))
        .and(query_param_is_missing("starting_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(objects(&["f1", "f2"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/function"))
        .and(query_param("starting_after", "f2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"message": "Forbidden", "code": "no_access"}
        })))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let err = client
        .functions()
        .list(ListOptions::new().limit(2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(err.message(), "Forbidden");
    assert_eq!(err.code(), Some("no_access"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_stream_keeps_terminal_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/prompt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Project not found"})))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let mut prompts = client.prompts().stream(ListOptions::new());

    let err = prompts.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(prompts.next().await.is_none());
    assert_eq!(prompts.error(), Some(&err));
}

// ============================================================================
// Event logs
// ============================================================================

#[tokio::test]
async fn test_experiment_events_deduplicated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/experiment/e1/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"id": "r1"}, {"id": "r2"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/experiment/e1/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"id": "r2"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/experiment/e1/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let events = client
        .experiment_events("e1")
        .fetch_all(ListOptions::new().limit(2))
        .await
        .unwrap();

    assert_eq!(ids(&events), vec!["r1", "r2"]);
}
