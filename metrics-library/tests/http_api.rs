//! Integration tests for the HTTP API.
//!
//! Each test builds the full router over an in-memory library and drives it
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use metrics_library::auth::Credentials;
use metrics_library::server::{create_app, state::AppState};
use metrics_library_repository::{Catalog, Library, LibraryConfig, MockPersistence};
use serde_json::{json, Value};
use tower::ServiceExt;

fn credentials() -> Credentials {
    Credentials::new("admin", "secret")
}

fn setup_test_app() -> Router {
    let library = Library::new(Arc::new(MockPersistence::new()));

    let mut catalog = Catalog::new();
    for metric in ["database1/test", "database2/test", "database3/test"] {
        catalog.insert("test1", "source1", metric);
    }
    catalog.insert("test1", "source2", "database2/test");
    catalog.insert("test2", "source1", "database1.test");
    catalog.insert("test2", "source3", "database1.test");
    library.refresh_catalog(catalog);

    create_app(AppState::new(Arc::new(library), Some(credentials())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>, auth: bool) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if auth {
        request = request.header(header::AUTHORIZATION, credentials().header_value());
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn location_id(response: &Response) -> String {
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap();
    location.rsplit('/').next().unwrap().to_string()
}

fn graph_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A great graph description.",
        "stack_mode": "normal",
        "stacks": [{
            "name": "stack0",
            "groups": [{
                "name": "group0",
                "type": "avg",
                "series": [
                    {"name": "serie0", "origin": "test1", "source": "source1", "metric": "database1/test"},
                    {"name": "serie1", "origin": "test1", "source": "group:group1", "metric": "database2/test"}
                ]
            }]
        }]
    })
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_origins() {
    let app = setup_test_app();

    let response = send(&app, "GET", "/catalog/origins/", None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["test1", "test2"]));

    let response = send(&app, "GET", "/catalog/origins?offset=1&limit=1", None, false).await;
    assert_eq!(body_json(response).await, json!(["test2"]));
}

#[tokio::test]
async fn test_catalog_sources() {
    let app = setup_test_app();

    let response = send(&app, "GET", "/catalog/sources/", None, false).await;
    assert_eq!(
        body_json(response).await,
        json!(["source1", "source2", "source3"])
    );

    let response = send(&app, "GET", "/catalog/sources/source1", None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"name": "source1", "origins": ["test1", "test2"]})
    );

    let response = send(&app, "GET", "/catalog/sources/unknown1", None, false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn test_catalog_metrics() {
    let app = setup_test_app();

    let response = send(&app, "GET", "/catalog/metrics/?source=source2", None, false).await;
    assert_eq!(body_json(response).await, json!(["database2/test"]));

    let response = send(&app, "GET", "/catalog/metrics/?filter=glob:database1*", None, false).await;
    assert_eq!(
        body_json(response).await,
        json!(["database1.test", "database1/test"])
    );

    let expected =
        json!({"name": "database2/test", "sources": ["source1", "source2"], "origins": ["test1"]});

    let response = send(&app, "GET", "/catalog/metrics/database2/test", None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, expected);

    let response = send(&app, "GET", "/catalog/metrics/database2%2Ftest", None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, expected);

    let response = send(&app, "GET", "/catalog/metrics/database1.test", None, false).await;
    assert_eq!(body_json(response).await["origins"], json!(["test2"]));

    let response = send(&app, "GET", "/catalog/metrics/unknown/test", None, false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_is_read_only() {
    let app = setup_test_app();
    let response = send(&app, "DELETE", "/catalog/origins/", None, true).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_invalid_filter_is_bad_request() {
    let app = setup_test_app();
    let response = send(&app, "GET", "/catalog/sources/?filter=regexp:%5B", None, false).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Library items
// ============================================================================

#[tokio::test]
async fn test_graph_lifecycle() {
    let app = setup_test_app();

    let response = send(&app, "POST", "/library/graphs/", Some(graph_payload("graph1")), false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "POST", "/library/graphs/", Some(graph_payload("graph1")), true).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = location_id(&response);

    let response = send(&app, "GET", &format!("/library/graphs/{}", id), None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = body_json(response).await;
    assert_eq!(stored["id"], json!(id));
    assert_eq!(stored["name"], "graph1");
    assert_eq!(stored["stacks"], graph_payload("graph1")["stacks"]);
    assert!(stored["modified"].is_string());

    let response = send(&app, "GET", "/library/graphs/", None, false).await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], json!(id));
    assert_eq!(list[0]["description"], "A great graph description.");

    let uri = format!("/library/graphs/{}", id);
    let response = send(&app, "PUT", &uri, Some(graph_payload("graph1-updated")), false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "PUT", &uri, Some(graph_payload("graph1-updated")), true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(send(&app, "GET", &uri, None, false).await).await;
    assert_eq!(updated["name"], "graph1-updated");
    assert_eq!(updated["id"], json!(id));

    let response = send(&app, "DELETE", &uri, None, false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "DELETE", &uri, None, true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &uri, None, false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &uri, None, true).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_item() {
    let app = setup_test_app();
    let response = send(
        &app,
        "PUT",
        "/library/graphs/00000000-0000-0000-0000-000000000000",
        Some(graph_payload("graph1")),
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_payloads() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/library/graphs/")
        .header(header::AUTHORIZATION, credentials().header_value())
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut payload = graph_payload("graph1");
    payload["stack_mode"] = json!("sideways");
    let response = send(&app, "POST", "/library/graphs/", Some(payload), true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filter_and_pagination() {
    let app = setup_test_app();
    for name in ["graph1-2", "graph1-0", "graph2-0", "graph1-1"] {
        let response = send(&app, "POST", "/library/graphs/", Some(graph_payload(name)), true).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let names = |list: Value| {
        list.as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap().to_string())
            .collect::<Vec<_>>()
    };

    let response = send(&app, "GET", "/library/graphs/?filter=glob:graph1-*", None, false).await;
    assert_eq!(names(body_json(response).await), vec!["graph1-0", "graph1-1", "graph1-2"]);

    let response = send(&app, "GET", "/library/graphs/?offset=1&limit=2", None, false).await;
    assert_eq!(names(body_json(response).await), vec!["graph1-1", "graph1-2"]);

    let response = send(&app, "GET", "/library/graphs/?offset=10", None, false).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_collection_inherit() {
    let app = setup_test_app();

    let payload = json!({
        "name": "collection0",
        "description": "A great collection description.",
        "entries": [{"id": "00000000-0000-0000-0000-000000000000", "options": {"range": "-1h"}}]
    });
    let response = send(&app, "POST", "/library/collections/", Some(payload), true).await;
    let source_id = location_id(&response);

    let response = send(
        &app,
        "POST",
        &format!("/library/collections/?inherit={}", source_id),
        Some(json!({"name": "collection1"})),
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = location_id(&response);
    assert_ne!(id, source_id);

    let copy = body_json(send(&app, "GET", &format!("/library/collections/{}", id), None, false).await).await;
    assert_eq!(copy["name"], "collection1");
    assert_eq!(copy["description"], "A great collection description.");
    assert_eq!(copy["entries"][0]["options"]["range"], "-1h");

    let response = send(
        &app,
        "POST",
        "/library/collections/?inherit=missing",
        Some(json!({"name": "collection2"})),
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_volatile_graph_read_once() {
    let app = setup_test_app();

    let response = send(
        &app,
        "POST",
        "/library/graphs/?volatile=1",
        Some(graph_payload("preview")),
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!("/library/graphs/{}", location_id(&response));

    let response = send(&app, "GET", &uri, None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "preview");

    let response = send(&app, "GET", &uri, None, false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = body_json(send(&app, "GET", "/library/graphs/", None, false).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_unsupported_methods() {
    let app = setup_test_app();

    let response = send(&app, "PUT", "/library/graphs/", Some(graph_payload("graph1")), true).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(body_json(response).await["message"].is_string());

    let response = send(&app, "GET", "/library/expand", None, false).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Groups and expansion
// ============================================================================

#[tokio::test]
async fn test_source_group_expand() {
    let app = setup_test_app();

    let group = json!({
        "name": "group1",
        "entries": [{"pattern": "glob:source*", "origin": "test1"}]
    });
    let response = send(&app, "POST", "/library/sourcegroups/", Some(group), true).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = location_id(&response);

    let stored = body_json(send(&app, "GET", &format!("/library/sourcegroups/{}", id), None, false).await).await;
    assert_eq!(stored["type"], "source");

    let response = send(
        &app,
        "POST",
        "/library/expand",
        Some(json!([["test1", "group:group1", "database1/test"]])),
        false,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([[
            ["test1", "source1", "database1/test"],
            ["test1", "source2", "database1/test"]
        ]])
    );
}

#[tokio::test]
async fn test_metric_group_expand() {
    let app = setup_test_app();

    let group = json!({
        "name": "group1",
        "entries": [
            {"pattern": "database1/test", "origin": "test1"},
            {"pattern": "regexp:database[23]/test", "origin": "test1"}
        ]
    });
    let response = send(&app, "POST", "/library/metricgroups/", Some(group), true).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        "POST",
        "/library/expand",
        Some(json!([["test1", "source1", "group:group1"]])),
        false,
    )
    .await;
    assert_eq!(
        body_json(response).await,
        json!([[
            ["test1", "source1", "database1/test"],
            ["test1", "source1", "database2/test"],
            ["test1", "source1", "database3/test"]
        ]])
    );
}

#[tokio::test]
async fn test_invalid_group_pattern() {
    let app = setup_test_app();

    let group = json!({
        "name": "group1",
        "entries": [{"pattern": "regexp:database[23", "origin": "test1"}]
    });
    let response = send(&app, "POST", "/library/metricgroups/", Some(group), true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expand_unknown_group() {
    let app = setup_test_app();
    let response = send(
        &app,
        "POST",
        "/library/expand",
        Some(json!([
            ["test1", "source1", "database1/test"],
            ["test1", "source1", "group:missing"]
        ])),
        false,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([[["test1", "source1", "database1/test"]], []])
    );
}

// ============================================================================
// Reload
// ============================================================================

#[tokio::test]
async fn test_reload_catalog_and_library() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(&catalog_path, r#"{"test1": {"source1": ["database1/test"]}}"#).unwrap();

    let library = Library::open(LibraryConfig::filesystem(&data_dir)).await.unwrap();
    library.refresh_catalog(
        serde_json::from_str(&std::fs::read_to_string(&catalog_path).unwrap()).unwrap(),
    );
    let app = create_app(
        AppState::new(Arc::new(library), Some(credentials()))
            .with_catalog_path(Some(catalog_path.clone())),
    );

    // Another writer on the same data directory.
    let writer = Library::open(LibraryConfig::filesystem(&data_dir)).await.unwrap();
    let writer_app = create_app(AppState::new(Arc::new(writer), None));
    let response = send(&writer_app, "POST", "/library/graphs/", Some(graph_payload("graph1")), false).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    std::fs::write(
        &catalog_path,
        r#"{"test1": {"source1": ["database1/test"]}, "test3": {"host1": ["cpu.idle"]}}"#,
    )
    .unwrap();

    let response = send(&app, "GET", "/library/graphs/", None, false).await;
    assert_eq!(body_json(response).await, json!([]));

    let response = send(&app, "GET", "/reload", None, false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/reload", None, true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/catalog/origins/", None, false).await;
    assert_eq!(body_json(response).await, json!(["test1", "test3"]));

    let response = send(&app, "GET", "/library/graphs/", None, false).await;
    let graphs = body_json(response).await;
    assert_eq!(graphs.as_array().unwrap().len(), 1);
    assert_eq!(graphs[0]["name"], "graph1");

    // A broken snapshot keeps the current catalog.
    std::fs::write(&catalog_path, "{").unwrap();
    let response = send(&app, "GET", "/reload", None, true).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, "GET", "/catalog/origins/", None, false).await;
    assert_eq!(body_json(response).await, json!(["test1", "test3"]));

    let response = send(&app, "POST", "/reload", None, true).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let response = send(&app, "GET", "/health", None, false).await;
    assert_eq!(response.status(), StatusCode::OK);
}
