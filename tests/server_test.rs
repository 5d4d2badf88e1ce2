// Integration tests for the HTTP server

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use teddy::providers::OpenAiProvider;
use teddy::server::{create_router, TeddyServer};
use teddy::store::JournalStore;

fn completion_body() -> String {
    let analysis = json!({
        "insight_text": "You gave yourself credit for a hard week.",
        "thought_patterns": [],
        "coping_strategies": ["Keep the evening walk going."]
    });
    json!({
        "id": "chatcmpl-test",
        "model": "gpt-4o-mini",
        "choices": [
            {"message": {"role": "assistant", "content": analysis.to_string()}}
        ]
    })
    .to_string()
}

fn router_against(server: &mockito::ServerGuard) -> axum::Router {
    let store = Arc::new(JournalStore::in_memory().expect("store"));
    let provider = OpenAiProvider::with_base_url("test-key".to_string(), server.url())
        .expect("provider")
        .with_model("gpt-4o-mini".to_string());
    let teddy = TeddyServer::new(store, Arc::new(provider), "gpt-4o-mini".to_string());
    create_router(Arc::new(teddy))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_entry_lifecycle_over_http() {
    let mut mock_api = mockito::Server::new_async().await;
    mock_api
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body())
        .create_async()
        .await;

    let app = router_against(&mock_api);

    // Create and analyze
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/entries",
            json!({
                "user_id": "user-1",
                "title": "Friday",
                "content": "A hard week but the evening walks helped.",
                "anxiety_level": 4
            }),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["report"]["analyzed"], true);
    let entry_id = created["entry"]["id"].as_str().expect("entry id").to_string();

    // Fetch the entry back
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/entries/{entry_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["is_analyzed"], true);

    // Attach a reflection
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/entries/{entry_id}/reflection"),
            json!({"reflection": "The walks really did help."}),
        ))
        .await
        .expect("reflection response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["user_reflection"], "The walks really did help.");

    // List for the user
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/users/user-1/entries")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("list response");
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 1);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/entries/{entry_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("delete response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/entries/{entry_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("second delete response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_anxiety_level_is_bad_request() {
    let mock_api = mockito::Server::new_async().await;
    let app = router_against(&mock_api);

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/entries",
            json!({
                "user_id": "user-1",
                "title": "Oops",
                "content": "anxiety out of range",
                "anxiety_level": 12
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "api_error");
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let mock_api = mockito::Server::new_async().await;
    let app = router_against(&mock_api);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/entries/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_claim_granted_once_per_day() {
    let mock_api = mockito::Server::new_async().await;
    let app = router_against(&mock_api);

    let claim = json!({"channel": "email", "user_id": "user-1"});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/v1/notifications/claim", claim.clone()))
        .await
        .expect("first claim");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["granted"], true);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/v1/notifications/claim", claim))
        .await
        .expect("second claim");
    assert_eq!(body_json(response).await["granted"], false);

    // A different channel is a separate slot
    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/notifications/claim",
            json!({"channel": "sms", "user_id": "user-1"}),
        ))
        .await
        .expect("sms claim");
    assert_eq!(body_json(response).await["granted"], true);
}

#[tokio::test]
async fn test_health_check() {
    let mock_api = mockito::Server::new_async().await;
    let app = router_against(&mock_api);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "gpt-4o-mini");
}
