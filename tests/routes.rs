use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use catalog_api::{
    auth::TokenKeys,
    error::INVALID_INPUT_BODY,
    routes::create_router,
    state::AppState,
    stores::MemoryStore,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> (Router, String) {
    let tokens = TokenKeys::new("route-test-secret", Duration::from_secs(600));
    let token = tokens.issue(1).expect("token");
    let state = AppState::with_store(MemoryStore::new(), tokens);
    (create_router(state), token)
}

async fn send(app: &Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_owned())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn api_routes_require_a_bearer_token() {
    let (app, _) = app();

    let (status, body) = send(&app, "/api/category/add", None, r#"{"name":"Toys"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["error"], "Unauthorized: empty auth header");

    let (status, _) = send(&app, "/api/category/add", Some("garbage"), r#"{"name":"Toys"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_gets_the_fixed_message() {
    let (app, token) = app();

    let (status, body) = send(&app, "/api/product/add", Some(&token), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], INVALID_INPUT_BODY);
    assert_eq!(body["data"]["error"], INVALID_INPUT_BODY);

    let (status, _) = send(&app, "/api/product/delete", Some(&token), r#"{"id":"one"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_errors_map_to_internal_server_error() {
    let (app, token) = app();

    let (status, body) = send(
        &app,
        "/api/product/add",
        Some(&token),
        r#"{"name":"","categoryies":["Toys"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "product name is empty");

    let (status, _) = send(&app, "/api/product/get-all", Some(&token), r#"{"tag":"all"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn product_and_category_flow() {
    let (app, token) = app();
    let token = Some(token.as_str());

    let (status, body) = send(&app, "/api/category/add", token, r#"{"name":"Electronics"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category_id"], 1);

    let (status, body) = send(
        &app,
        "/api/product/add",
        token,
        r#"{"name":"Laptop","categoryies":["Electronics"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product_id"], 1);

    let (_, body) = send(&app, "/api/product/get", token, r#"{"category":"Electronics"}"#).await;
    assert_eq!(
        body["data"],
        json!([{"id":1,"name":"Laptop","categoryies":[{"id":1,"name":"Electronics"}]}])
    );

    let (status, _) = send(&app, "/api/product/edit-name", token, r#"{"id":1,"name":"Notebook"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "/api/category/delete", token, r#"{"id":1}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "/api/product/get-all", token, r#"{"tag":"get all products"}"#).await;
    assert_eq!(body["data"], json!([{"id":1,"name":"Notebook","categoryies":[]}]));

    let (_, body) = send(&app, "/api/category/get-all", token, r#"{"tag":"get all products"}"#).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn sign_up_then_sign_in_returns_a_usable_token() {
    let (app, _) = app();
    let credentials = r#"{"email":"ana@example.com","password":"hunter2"}"#;

    let (status, body) = send(&app, "/auth/sign-up", None, credentials).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);

    let (status, body) = send(&app, "/auth/sign-in", None, credentials).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().expect("token").to_owned();

    let (status, _) = send(&app, "/api/category/get-all", Some(&token), r#"{"tag":"get all products"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "/auth/sign-in",
        None,
        r#"{"email":"ana@example.com","password":"nope"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "invalid credentials");
}

#[tokio::test]
async fn unknown_paths_fall_through_to_not_found() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
