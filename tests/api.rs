//! HTTP tests for the EmoGo router, backed by the in-memory store or demo mode.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use emogo_api::config::Config;
use emogo_api::store::{MemoryRecordStore, MoodRepo};
use emogo_api::{build_router, AppState};

const BOUNDARY: &str = "emogo-test-boundary";

fn memory_app() -> (Router, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new());
    let state = AppState::new(MoodRepo::new(store.clone()), Config::default());
    (build_router(state), store)
}

fn demo_app() -> Router {
    build_router(AppState::new(MoodRepo::demo(), Config::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    (status, headers, body)
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).expect("response body is JSON");
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
            b = BOUNDARY,
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/records/upload/video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn mood_body(mood: Value) -> Value {
    json!({
        "mood": mood,
        "activity": "working",
        "longitude": 121.5654,
        "latitude": 25.0330,
        "video_url": "s3://bucket/video.mp4",
    })
}

async fn create(app: &Router, body: &Value) -> String {
    let (status, value) = send_json(app, post_json("/api/records", body)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", value);
    value["id"].as_str().expect("id in response").to_string()
}

#[tokio::test]
async fn root_reports_storage_status() {
    let (app, _) = memory_app();
    let (status, body) = send_json(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "EmoGo Backend API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["status"], "running");
    assert_eq!(body["db_status"], "connected");

    let (status, body) = send_json(&demo_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["db_status"], "demo_mode");
}

#[tokio::test]
async fn creating_each_valid_mood_echoes_it_back() {
    let (app, store) = memory_app();

    for mood in 1..=5 {
        let (status, body) = send_json(&app, post_json("/api/records", &mood_body(json!(mood)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Record created successfully");
        assert_eq!(body["data"]["mood"], mood);
        assert_eq!(body["data"]["activity"], "working");
        assert!(body["data"]["created_at"].is_string());
        assert!(!body["id"].as_str().unwrap().is_empty());
    }

    assert_eq!(store.len().await, 5);
}

#[tokio::test]
async fn invalid_mood_is_rejected_and_not_persisted() {
    let (app, store) = memory_app();

    for mood in [json!(0), json!(6), json!(2.5), json!("great"), json!(null)] {
        let (status, body) = send_json(&app, post_json("/api/records", &mood_body(mood.clone()))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "mood {}", mood);
        assert_eq!(body["error"]["field"], "mood");
        assert_eq!(body["error"]["code"], 422);
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn malformed_json_body_is_a_bad_request() {
    let (app, store) = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/records")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"mood\": 3,"))
        .unwrap();

    let (status, _) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn created_record_can_be_fetched_by_id() {
    let (app, _) = memory_app();
    let body = json!({
        "mood": 2,
        "longitude": -73.9857,
        "latitude": 40.7484,
        "created_at": "2024-02-29T23:59:59Z",
    });
    let id = create(&app, &body).await;

    let (status, fetched) = send_json(&app, get(&format!("/api/records/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["mood"], 2);
    assert_eq!(fetched["longitude"], -73.9857);
    assert_eq!(fetched["latitude"], 40.7484);
    assert!(fetched["activity"].is_null());
    assert!(fetched["video_url"].is_null());
    assert_eq!(fetched["created_at"], "2024-02-29T23:59:59Z");
}

#[tokio::test]
async fn missing_and_malformed_ids() {
    let (app, _) = memory_app();

    let (status, body) = send_json(
        &app,
        get("/api/records/6f1c2a9e-0000-4000-8000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Record not found");

    let (status, _) = send_json(&app, get("/api/records/not-an-id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_applies_limit() {
    let (app, _) = memory_app();
    for mood in [1, 2, 3, 4] {
        create(&app, &mood_body(json!(mood))).await;
    }

    let (status, body) = send_json(&app, get("/api/records")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["records"].as_array().unwrap().len(), 4);
    assert!(body["records"][0]["id"].is_string());

    let (_, body) = send_json(&app, get("/api/records?limit=2")).await;
    assert_eq!(body["count"], 2);

    let (status, _) = send_json(&app, get("/api/records?limit=-3")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, get("/api/records?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn csv_export_has_header_and_one_row_per_record() {
    let (app, _) = memory_app();
    create(&app, &mood_body(json!(4))).await;
    create(
        &app,
        &json!({"mood": 1, "longitude": 1.5, "latitude": 2.5, "created_at": "2024-01-01T00:00:00Z"}),
    )
    .await;
    create(&app, &mood_body(json!(5))).await;

    let (status, headers, body) = send(&app, get("/api/export/csv")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=mood_records.csv"
    );

    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "id,mood,activity,longitude,latitude,video_url,created_at");

    let sparse = lines
        .iter()
        .find(|l| l.contains(",1,"))
        .expect("row for the record without activity");
    let cells: Vec<&str> = sparse.split(',').collect();
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[2], "");
    assert_eq!(cells[5], "");
    assert_eq!(cells[6], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn csv_export_of_empty_collection_is_not_found() {
    let (app, _) = memory_app();
    let (status, body) = send_json(&app, get("/api/export/csv")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No records to export");
}

#[tokio::test]
async fn stats_average_and_distribution() {
    let (app, _) = memory_app();

    let (status, body) = send_json(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "No records available"}));

    for mood in [1, 3, 5, 5] {
        create(&app, &mood_body(json!(mood))).await;
    }

    let (status, body) = send_json(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 4);
    assert_eq!(body["average_mood"], 3.5);
    assert_eq!(
        body["mood_distribution"],
        json!({"1": 1, "2": 0, "3": 1, "4": 0, "5": 2})
    );
}

#[tokio::test]
async fn video_upload_reports_metadata_without_storing() {
    let (app, store) = memory_app();

    let (status, body) = send_json(&app, upload("file", "clip.mp4", "video/mp4", b"not really mp4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Video uploaded successfully");
    assert_eq!(body["filename"], "clip.mp4");
    assert_eq!(body["content_type"], "video/mp4");
    assert_eq!(body["size_bytes"], 14);
    assert_eq!(body["note"], "In production, save to S3 or cloud storage");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn video_upload_rejects_other_content() {
    let (app, _) = memory_app();

    let (status, body) = send_json(&app, upload("file", "notes.txt", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "File must be a video");

    let (status, _) = send_json(&app, upload("attachment", "clip.mp4", "video/mp4", b"x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, post_json("/api/records/upload/video", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn demo_mode_degrades_storage_endpoints_uniformly() {
    let app = demo_app();

    let requests = vec![
        post_json("/api/records", &mood_body(json!(3))),
        get("/api/records"),
        get("/api/records/6f1c2a9e-0000-4000-8000-000000000000"),
        get("/api/export/csv"),
        get("/api/stats"),
    ];

    for request in requests {
        let uri = request.uri().to_string();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["error"]["message"], "Database not available", "{}", uri);
    }

    let (status, _) = send_json(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, upload("file", "clip.webm", "video/webm", b"abc")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn readiness_follows_store() {
    let (app, _) = memory_app();
    let (status, body) = send_json(&app, get("/readyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "ok");

    let (status, body) = send_json(&demo_app(), get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["database"], "demo_mode");

    let (status, body) = send_json(&demo_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sparse_stored_document_is_listed_exported_and_counted() {
    let (app, store) = memory_app();
    let id = store
        .insert_document(json!({"mood": 4, "longitude": 1.0, "latitude": 2.0}))
        .await;

    let (status, body) = send_json(&app, get("/api/records")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["id"], id.to_string().as_str());
    assert!(body["records"][0]["created_at"].is_null());

    let (status, _, csv) = send(&app, get("/api/export/csv")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(csv.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], format!("{},4,,1.0,2.0,,", id));

    let (status, body) = send_json(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 1);
    assert_eq!(body["average_mood"], 4.0);
    assert_eq!(body["mood_distribution"]["4"], 1);
}

#[tokio::test]
async fn undecodable_documents_still_count_as_existing_records() {
    let (app, store) = memory_app();
    store.insert_document(json!({"mood": "meh"})).await;
    create(&app, &mood_body(json!(2))).await;

    let (status, body) = send_json(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 2);
    assert_eq!(body["average_mood"], 2.0);

    let (status, _, csv) = send(&app, get("/api/export/csv")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(csv.to_vec()).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn large_video_upload_is_measured_across_chunks() {
    let (app, _) = memory_app();
    let data = vec![0x42u8; 256 * 1024];

    let (status, body) = send_json(&app, upload("file", "long.mov", "video/quicktime", &data)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["size_bytes"], data.len());
    assert_eq!(body["content_type"], "video/quicktime");
}
