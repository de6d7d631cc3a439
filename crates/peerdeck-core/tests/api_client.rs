//! API client contract tests against an in-process mock backend.

use std::io::Write;

use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::watch;

use peerdeck_core::api::{ApiClient, UploadProgress};
use peerdeck_core::Error;

/// Serve `router` on an ephemeral port and return a client pointed at it.
async fn client_for(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    ApiClient::new(format!("http://{addr}"))
}

fn happy_router() -> Router {
    Router::new()
        .route(
            "/api/files",
            get(|| async {
                Json(json!({
                    "success": true,
                    "files": [
                        {
                            "name": "notes.txt",
                            "size": 2048,
                            "size_human": "2.0 KB",
                            "modified": "2026-08-01T10:00:00",
                            "extension": ".txt"
                        }
                    ],
                    "count": 1
                }))
            }),
        )
        .route(
            "/api/peers",
            get(|| async {
                Json(json!({
                    "success": true,
                    "peers": {
                        "10.0.0.1:5000": {
                            "ip": "10.0.0.1",
                            "port": 5000,
                            "name": "workstation",
                            "status": "online",
                            "last_seen": "2026-08-01T10:00:00"
                        }
                    },
                    "active_peers": {},
                    "total_peers": 1,
                    "active_count": 0
                }))
            }),
        )
        .route(
            "/api/stats",
            get(|| async {
                Json(json!({
                    "success": true,
                    "stats": {
                        "total_files": 3,
                        "total_file_size_human": "12.5 MB",
                        "total_peers": 2,
                        "active_peers": 1
                    }
                }))
            }),
        )
}

#[tokio::test]
async fn standard_call_returns_parsed_payload() {
    let client = client_for(happy_router()).await;

    let resp = client.list_files().await.expect("list files");
    assert!(resp.success);
    assert_eq!(resp.files.len(), 1);
    assert_eq!(resp.files[0].name, "notes.txt");
    assert_eq!(resp.files[0].size_human, "2.0 KB");
}

#[tokio::test]
async fn business_failure_is_returned_not_thrown() {
    let router = Router::new().route(
        "/api/files",
        get(|| async {
            Json(json!({
                "success": false,
                "message": "Error listing files: disk unavailable"
            }))
        }),
    );
    let client = client_for(router).await;

    // Transport succeeded, so the caller gets the payload and inspects
    // the success flag itself.
    let resp = client.list_files().await.expect("transport ok");
    assert!(!resp.success);
    assert!(resp.files.is_empty());
    assert_eq!(
        resp.message.as_deref(),
        Some("Error listing files: disk unavailable")
    );
}

#[tokio::test]
async fn http_error_uses_body_message() {
    let router = Router::new().route(
        "/api/files/delete/{filename}",
        delete(|Path(_filename): Path<String>| async {
            (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" })))
        }),
    );
    let client = client_for(router).await;

    let err = client.delete_file("ghost.txt").await.unwrap_err();
    match err {
        Error::Request { message } => assert_eq!(message, "not found"),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_without_message_reports_status() {
    let router = Router::new().route(
        "/api/stats",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = client_for(router).await;

    let err = client.stats().await.unwrap_err();
    match err {
        Error::Request { message } => assert!(message.contains("500"), "message: {message}"),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_signaled() {
    // Nothing is listening here.
    let client = ApiClient::new("http://127.0.0.1:1");

    let err = client.list_peers().await.unwrap_err();
    assert!(matches!(err, Error::Request { .. }));
}

#[tokio::test]
async fn add_peer_sends_expected_body() {
    let router = Router::new().route(
        "/api/peers/add",
        post(|Json(body): Json<Value>| async move {
            let ip = body["ip"].as_str().unwrap_or_default().to_string();
            let port = body["port"].as_u64().unwrap_or_default();
            Json(json!({
                "success": true,
                "message": body.to_string(),
                "peer_id": format!("{ip}:{port}")
            }))
        }),
    );
    let client = client_for(router).await;

    let resp = client.add_peer("10.0.0.9", 5000, None).await.expect("add");
    assert!(resp.success);
    assert_eq!(resp.peer_id.as_deref(), Some("10.0.0.9:5000"));
    // An absent name is omitted from the payload entirely.
    assert!(!resp.message.unwrap_or_default().contains("name"));

    let resp = client
        .add_peer("10.0.0.9", 5000, Some("workstation"))
        .await
        .expect("add named");
    assert!(resp.message.unwrap_or_default().contains("workstation"));
}

#[tokio::test]
async fn peer_id_round_trips_through_path_encoding() {
    let router = Router::new().route(
        "/api/peers/{peer_id}/files",
        get(|Path(peer_id): Path<String>| async move {
            Json(json!({
                "success": true,
                "files": [],
                "message": peer_id
            }))
        }),
    );
    let client = client_for(router).await;

    // The colon in the peer id must survive the percent-encoded segment.
    let resp = client.peer_files("10.0.0.1:5000").await.expect("peer files");
    assert_eq!(resp.message.as_deref(), Some("10.0.0.1:5000"));
}

#[tokio::test]
async fn batched_dashboard_calls_fail_as_a_unit() {
    let router = Router::new()
        .route(
            "/api/files",
            get(|| async { Json(json!({ "success": true, "files": [] })) }),
        )
        .route(
            "/api/peers",
            get(|| async { Json(json!({ "success": true, "peers": {}, "active_peers": {} })) }),
        )
        .route(
            "/api/stats",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let client = client_for(router).await;

    let batch = tokio::try_join!(client.list_files(), client.list_peers(), client.stats());
    assert!(batch.is_err());
}

#[tokio::test]
async fn batched_dashboard_calls_succeed_together() {
    let client = client_for(happy_router()).await;

    let (files, peers, stats) =
        tokio::try_join!(client.list_files(), client.list_peers(), client.stats())
            .expect("batch");
    assert!(files.success && peers.success && stats.success);
    assert_eq!(stats.stats.expect("stats payload").total_files, 3);
}

fn upload_router() -> Router {
    Router::new().route(
        "/api/files/upload",
        post(|mut multipart: Multipart| async move {
            let mut received: usize = 0;
            let mut name = String::new();
            while let Some(field) = multipart.next_field().await.expect("field") {
                name = field.file_name().unwrap_or_default().to_string();
                received += field.bytes().await.expect("bytes").len();
            }
            Json(json!({
                "success": true,
                "message": format!("File {name} uploaded successfully ({received} bytes)")
            }))
        }),
    )
}

fn temp_upload_file(len: usize) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let mut file = std::fs::File::create(dir.path().join("payload.bin")).expect("create");
    file.write_all(&vec![0xA5u8; len]).expect("write");
    dir
}

#[tokio::test]
async fn upload_reports_monotonic_progress_ending_at_completion() {
    let client = client_for(upload_router()).await;
    let dir = temp_upload_file(256 * 1024);

    let (tx, mut rx) = watch::channel(UploadProgress::default());
    let collector = tokio::spawn(async move {
        let mut percents = Vec::new();
        while rx.changed().await.is_ok() {
            percents.push(rx.borrow().percent());
        }
        percents
    });

    let resp = client
        .upload_file(&dir.path().join("payload.bin"), Some(tx))
        .await
        .expect("upload");
    assert!(resp.success);
    assert!(resp
        .message
        .unwrap_or_default()
        .contains(&format!("{} bytes", 256 * 1024)));

    let percents = collector.await.expect("collector");
    assert!(!percents.is_empty());
    assert!(
        percents.windows(2).all(|w| w[0] <= w[1]),
        "progress must be non-decreasing: {percents:?}"
    );
    assert!((percents.last().copied().unwrap() - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn upload_without_subscriber_completes() {
    let client = client_for(upload_router()).await;
    let dir = temp_upload_file(8 * 1024);

    let resp = client
        .upload_file(&dir.path().join("payload.bin"), None)
        .await
        .expect("upload");
    assert!(resp.success);
}

#[tokio::test]
async fn upload_non_2xx_fails_with_status() {
    let router = Router::new().route(
        "/api/files/upload",
        post(|mut multipart: Multipart| async move {
            // Drain the body so the client reliably sees the status.
            while let Some(field) = multipart.next_field().await.expect("field") {
                let _ = field.bytes().await;
            }
            StatusCode::INSUFFICIENT_STORAGE
        }),
    );
    let client = client_for(router).await;
    let dir = temp_upload_file(1024);

    let err = client
        .upload_file(&dir.path().join("payload.bin"), None)
        .await
        .unwrap_err();
    match err {
        Error::Upload { message } => assert!(message.contains("507"), "message: {message}"),
        other => panic!("expected upload error, got {other:?}"),
    }
}
