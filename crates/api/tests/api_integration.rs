//! API integration tests.
//!
//! These tests drive the full router against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use streamhub_api::{AppState, HttpEvent, handle_event, router as api_router};
use streamhub_common::Config;
use streamhub_db::entities::{stream, user};
use tower::ServiceExt;

fn create_test_config() -> Config {
    Config::with_database_url("postgres://localhost/test")
}

/// Create the test router over a prepared mock database.
fn create_test_router_with(db: MockDatabase, config: &Config) -> Router {
    let state = AppState::new(Arc::new(db.into_connection()), config);
    api_router().with_state(state)
}

fn create_test_router(db: MockDatabase) -> Router {
    create_test_router_with(db, &create_test_config())
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn create_test_user(id: i32) -> user::Model {
    user::Model {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_string(),
        display_name: format!("User {id}"),
        avatar_url: None,
        bio: Some("New streamer".to_string()),
        subscriber_count: 10,
        is_verified: true,
        created_at: Utc::now().into(),
    }
}

fn create_test_stream(id: i32, user_id: i32, is_live: bool) -> stream::Model {
    stream::Model {
        id,
        user_id,
        title: format!("Stream {id}"),
        description: None,
        category: Some("Games".to_string()),
        is_live,
        video_url: None,
        thumbnail_url: None,
        duration: 0,
        view_count: 3,
        like_count: 1,
        stream_key: Some("secret-key".to_string()),
        created_at: Utc::now().into(),
        started_at: None,
    }
}

fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_str<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_preflight_on_every_endpoint() {
    for (path, allowed, not_allowed) in [
        ("/api", "DELETE", ""),
        ("/streaming", "GET", "DELETE"),
        ("/upload-video", "POST", "GET"),
    ] {
        let app = create_test_router(empty_db());
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(path)
                    .header(header::ORIGIN, "https://frontend.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(header_str(&response, "access-control-allow-origin"), "*");
        assert_eq!(header_str(&response, "access-control-max-age"), "86400");

        let methods = header_str(&response, "access-control-allow-methods").to_string();
        assert!(methods.contains(allowed), "{path}: {methods}");
        if !not_allowed.is_empty() {
            assert!(!methods.contains(not_allowed), "{path}: {methods}");
        }

        let headers = header_str(&response, "access-control-allow-headers").to_lowercase();
        assert!(headers.contains("content-type"));
        assert!(headers.contains("x-user-id"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn test_preflight_allows_admin_token_on_actions_only() {
    for (path, expect_admin_header) in [("/api?action=get_users", true), ("/streaming", false)] {
        let app = create_test_router(empty_db());
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(path)
                    .header(header::ORIGIN, "https://admin.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-admin-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let headers = header_str(&response, "access-control-allow-headers").to_lowercase();
        assert_eq!(
            headers.contains("x-admin-token"),
            expect_admin_header,
            "{path}: {headers}"
        );
    }
}

#[tokio::test]
async fn test_preflight_skips_user_header_check() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/streaming?action=start_stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("GET", "/api?action=nope", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(header_str(&response, "access-control-allow-origin"), "*");
    assert_eq!(body_json(response).await["error"], "Not found");
}

#[tokio::test]
async fn test_wrong_method_for_action_is_not_found() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("POST", "/api?action=streams", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_query_is_json_bad_request() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("GET", "/api?action=streams&action=users", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header_str(&response, "content-type"), "application/json");
    assert_eq!(body_json(response).await["error"], "Invalid query string");
}

#[tokio::test]
async fn test_streaming_malformed_query_is_json_bad_request() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/streaming?action=start_stream&action=stop_stream")
                .header("X-User-Id", "7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header_str(&response, "content-type"), "application/json");
    assert_eq!(body_json(response).await["error"], "Invalid query string");
}

#[tokio::test]
async fn test_oversized_body_is_json_payload_too_large() {
    let app = create_test_router(empty_db());
    let body = format!(r#"{{"user_id": 1, "stream_id": 2, "pad": "{}"}}"#, "x".repeat(2 * 1024 * 1024));

    let response = app
        .oneshot(request("POST", "/api?action=like", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(header_str(&response, "content-type"), "application/json");
    assert_eq!(body_json(response).await["error"], "Payload too large");
}

#[tokio::test]
async fn test_list_streams_with_authors() {
    let db = empty_db().append_query_results([[(
        create_test_stream(1, 7, true),
        create_test_user(7),
    )]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api?action=streams&category=%D0%92%D1%81%D0%B5&is_live=true", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let streams = body.as_array().unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0]["id"], 1);
    assert_eq!(streams[0]["username"], "user7");
    assert_eq!(streams[0]["is_verified"], true);
    assert!(streams[0].get("stream_key").is_none());
}

#[tokio::test]
async fn test_list_users_hides_credentials() {
    let db = empty_db().append_query_results([[create_test_user(1), create_test_user(2)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api?action=users", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("email").is_none());
}

#[tokio::test]
async fn test_database_failure_hides_detail() {
    // No query results are queued, so the mock fails the query.
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("GET", "/api?action=users", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Internal server error");
}

#[tokio::test]
async fn test_subscribe_requires_ids() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("POST", "/api?action=subscribe", r#"{"subscriber_id": 1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "subscriber_id and channel_id required"
    );
}

#[tokio::test]
async fn test_subscribe_success() {
    let db = empty_db().append_exec_results([
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        },
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        },
    ]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=subscribe",
            r#"{"subscriber_id": 1, "channel_id": 2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"success": true}));
}

#[tokio::test]
async fn test_like_malformed_json_is_bad_request() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("POST", "/api?action=like", "{user_id: 1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_create_stream_returns_created() {
    let db = empty_db().append_query_results([[create_test_stream(5, 1, true)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=create_stream",
            r#"{"user_id": 1, "title": "Stream 5", "category": "Games"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"id": 5, "title": "Stream 5", "is_live": true})
    );
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=register",
            r#"{"username": "ab", "email": "ab@example.com", "password": "secret1", "display_name": "AB"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Username must be at least 3 characters"
    );
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=register",
            r#"{"username": "alice"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "All fields are required");
}

#[tokio::test]
async fn test_register_duplicate() {
    let db = empty_db().append_query_results([[create_test_user(1)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=register",
            r#"{"username": "user1", "email": "fresh@example.com", "password": "secret1", "display_name": "Dup"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Email or username already in use"
    );
}

#[tokio::test]
async fn test_login_unknown_email() {
    let db = empty_db().append_query_results([Vec::<user::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request(
            "POST",
            "/api?action=login",
            r#"{"email": "ghost@example.com", "password": "secret1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn test_admin_token_guards_admin_actions() {
    let mut config = create_test_config();
    config.admin.token = Some("s3cret".to_string());
    let app = create_test_router_with(empty_db(), &config);

    let response = app
        .oneshot(request("GET", "/api?action=get_users", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_get_users_with_token() {
    let mut config = create_test_config();
    config.admin.token = Some("s3cret".to_string());
    let db = empty_db().append_query_results([[create_test_user(3)]]);
    let app = create_test_router_with(db, &config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api?action=get_users")
                .header("X-Admin-Token", "s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["users"][0]["id"], 3);
    assert_eq!(body["users"][0]["email"], "user3@example.com");
}

#[tokio::test]
async fn test_admin_get_videos_shape() {
    let db = empty_db().append_query_results([[create_test_stream(9, 2, false)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("GET", "/api?action=get_videos", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"videos": [{
            "stream_id": 9,
            "title": "Stream 9",
            "user_id": 2,
            "view_count": 3,
            "like_count": 1,
        }]})
    );
}

#[tokio::test]
async fn test_delete_user_requires_id() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("DELETE", "/api?action=delete_user", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "user_id required");
}

#[tokio::test]
async fn test_delete_missing_video_is_not_found() {
    let db = empty_db().append_query_results([Vec::<stream::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("DELETE", "/api?action=delete_video&video_id=12", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_videos_reports_count() {
    let db = empty_db().append_exec_results([
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        },
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 5,
        },
    ]);
    let app = create_test_router(db);

    let response = app
        .oneshot(request("DELETE", "/api?action=clear_videos", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"success": true, "deleted_count": 5})
    );
}

#[tokio::test]
async fn test_streaming_requires_user_header() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(request("POST", "/streaming", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(header_str(&response, "access-control-allow-origin"), "*");
    assert_eq!(body_json(response).await["error"], "User ID required");
}

#[tokio::test]
async fn test_streaming_non_integer_user_header() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/streaming")
                .header("X-User-Id", "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_streaming_create_session() {
    let mut live = create_test_stream(42, 1, false);
    live.title = "Untitled Stream".to_string();
    let db = empty_db().append_query_results([[live]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/streaming")
                .header("X-User-Id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["stream_id"], 42);
    assert_eq!(body["watch_url"], "/watch?v=42");

    let key = body["stream_key"].as_str().unwrap();
    assert_eq!(
        body["stream_url"],
        format!("rtmp://stream.example.com/live/{key}")
    );
}

#[tokio::test]
async fn test_streaming_start_stream() {
    let db = empty_db().append_exec_results([MockExecResult {
        last_insert_id: 0,
        rows_affected: 0,
    }]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/streaming?action=start_stream&stream_id=5")
                .header("X-User-Id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"message": "Stream started", "is_live": true})
    );
}

#[tokio::test]
async fn test_streaming_stop_requires_stream_id() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/streaming?action=stop_stream")
                .header("X-User-Id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "stream_id required");
}

#[tokio::test]
async fn test_streaming_invalid_action() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/streaming?action=rewind")
                .header("X-User-Id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid action");
}

#[tokio::test]
async fn test_upload_rejects_get() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/upload-video")
                .header("X-User-Id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method not allowed");
}

#[tokio::test]
async fn test_upload_video() {
    let db = empty_db().append_query_results([[create_test_stream(77, 1, false)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload-video")
                .header("X-User-Id", "1")
                .body(Body::from(
                    r#"{"title": "Trip", "video_url": "https://cdn.example.com/trip.mp4", "duration": 95}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"video_id": 77, "message": "Video uploaded successfully"})
    );
}

#[tokio::test]
async fn test_function_event_preflight() {
    let app = create_test_router(empty_db());
    let event = HttpEvent {
        http_method: Some("OPTIONS".to_string()),
        path: Some("/api".to_string()),
        ..Default::default()
    };

    let response = handle_event(app, event).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.body.is_empty());
    assert_eq!(
        response.headers.get("access-control-allow-origin").map(String::as_str),
        Some("*")
    );
}

#[tokio::test]
async fn test_function_event_action() {
    let app = create_test_router(empty_db());
    let event = HttpEvent {
        http_method: Some("GET".to_string()),
        path: Some("/api".to_string()),
        query_string_parameters: Some(HashMap::from([(
            "action".to_string(),
            "missing".to_string(),
        )])),
        ..Default::default()
    };

    let response = handle_event(app, event).await.unwrap();

    assert_eq!(response.status_code, 404);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["error"], "Not found");
}
