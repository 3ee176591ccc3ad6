use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;

use sapporo_food_core::catalog::{CatalogClient, CatalogConfig, CatalogError, DatastoreQuery};

async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().expect("stub listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stub server failed");
    });
    addr
}

fn client_for(addr: SocketAddr) -> CatalogClient {
    let config = CatalogConfig::new("test-resource")
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(5));
    CatalogClient::new(config).expect("failed to build catalog client")
}

#[tokio::test]
async fn fetch_parses_a_success_envelope() {
    let envelope = json!({
        "success": true,
        "result": {
            "total": 2,
            "records": [
                {"区名": "中央区", "業種区分名": "スナック", "屋号": "テスト店"},
                {"区名": "北区"}
            ]
        }
    });
    let body = envelope.clone();
    let router = Router::new().route(
        "/datastore_search",
        get(move || async move { Json(body) }),
    );
    let client = client_for(spawn_stub(router).await);

    let batch = client
        .fetch(&DatastoreQuery::limit(10))
        .await
        .expect("fetch should succeed");

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.records()[0].ward(), Some("中央区"));
    assert_eq!(batch.records()[1].business_type(), None);
    assert_eq!(batch.into_raw(), envelope);
}

#[tokio::test]
async fn fetch_forwards_resource_id_keyword_and_limit() {
    let router = Router::new().route(
        "/datastore_search",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({
                "success": true,
                "result": {"records": [params]}
            }))
        }),
    );
    let client = client_for(spawn_stub(router).await);

    let query = DatastoreQuery::keyword("中央区").with_limit(25);
    let batch = client.fetch(&query).await.expect("fetch should succeed");

    let echoed = &batch.records()[0];
    assert_eq!(echoed.field("resource_id"), Some("test-resource"));
    assert_eq!(echoed.field("q"), Some("中央区"));
    assert_eq!(echoed.field("limit"), Some("25"));
}

#[tokio::test]
async fn source_failure_envelope_survives_untouched() {
    let envelope = json!({
        "success": false,
        "error": {"message": "Resource \"nope\" was not found.", "__type": "Not Found Error"}
    });
    let body = envelope.clone();
    let router = Router::new().route(
        "/datastore_search",
        get(move || async move { Json(body) }),
    );
    let client = client_for(spawn_stub(router).await);

    let err = client
        .fetch(&DatastoreQuery::limit(10))
        .await
        .expect_err("a success:false envelope should surface as an error");
    match err {
        CatalogError::SourceFailure(raw) => assert_eq!(raw, envelope),
        other => panic!("expected SourceFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_status_is_rejected() {
    let router = Router::new().route(
        "/datastore_search",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream broke") }),
    );
    let client = client_for(spawn_stub(router).await);

    let err = client
        .fetch(&DatastoreQuery::limit(10))
        .await
        .expect_err("a 500 should surface as an error");
    match err {
        CatalogError::Rejected { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream broke");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_a_decode_error() {
    let router = Router::new().route("/datastore_search", get(|| async { "not json" }));
    let client = client_for(spawn_stub(router).await);

    let err = client
        .fetch(&DatastoreQuery::limit(10))
        .await
        .expect_err("garbage should surface as an error");
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn connection_failure_is_unavailable() {
    // Bind and immediately drop a listener so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind throwaway listener");
    let addr = listener.local_addr().expect("listener has no address");
    drop(listener);
    let client = client_for(addr);

    let err = client
        .fetch(&DatastoreQuery::limit(10))
        .await
        .expect_err("a closed port should surface as an error");
    assert!(matches!(err, CatalogError::Unavailable(_)));
}
