//! HTTP-level tests for the items router: authentication, validation,
//! the camelCase boundary, and the CRUD round trip.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{test_router, valid_item_body};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn authed(request: axum::http::request::Builder) -> axum::http::request::Builder {
    request.header(header::AUTHORIZATION, "Bearer test-token")
}

fn post_item(body: &Value) -> Request<Body> {
    authed(Request::builder().method("POST").uri("/items"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_item(id: &str) -> Request<Body> {
    authed(Request::builder().method("GET").uri(format!("/items/{}", id)))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_request_without_authorization_is_401() {
    let router = test_router();
    let request = Request::builder()
        .method("GET")
        .uri("/items")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_non_bearer_authorization_is_401() {
    let router = test_router();
    let request = Request::builder()
        .method("GET")
        .uri("/items")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_empty_bearer_token_is_401() {
    let router = test_router();
    let request = Request::builder()
        .method("GET")
        .uri("/items")
        .header(header::AUTHORIZATION, "Bearer ")
        .body(Body::empty())
        .unwrap();

    let (status, _body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_item_returns_201_with_camel_case_body() {
    let router = test_router();

    let (status, body) = send(&router, post_item(&valid_item_body())).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(body["name"], "Test Item");
    assert_eq!(body["postcode"], "10001");
    assert_eq!(body["directionFromNewYork"], "NE");
    assert!(body["id"].is_string());
    assert!(body["startDate"].is_string());
    assert!(body["createdAt"].is_string());

    for key in body.as_object().unwrap().keys() {
        assert!(!key.contains('_'), "snake_case key leaked: {}", key);
    }
}

#[tokio::test]
async fn test_create_then_get_round_trips_field_values() {
    let router = test_router();

    let (status, created) = send(&router, post_item(&valid_item_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&router, get_item(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_item_missing_required_field_is_422() {
    let router = test_router();
    let mut body = valid_item_body();
    body.as_object_mut().unwrap().remove("name");

    let (status, _body) = send(&router, post_item(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_item_invalid_postcode_is_422() {
    let router = test_router();
    let mut body = valid_item_body();
    body["postcode"] = json!("invalid");

    let (status, body) = send(&router, post_item(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["postcode"].is_array());
}

#[tokio::test]
async fn test_create_item_start_date_too_soon_is_422() {
    let router = test_router();
    let mut body = valid_item_body();
    body["startDate"] = json!(chrono::Utc::now().to_rfc3339());

    let (status, _body) = send(&router, post_item(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_item_name_not_in_users_is_422() {
    let router = test_router();
    let mut body = valid_item_body();
    body["users"] = json!(["User Two", "User Three"]);

    let (status, _body) = send(&router, post_item(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_items_contains_created_item() {
    let router = test_router();

    let (_, created) = send(&router, post_item(&valid_item_body())).await;

    let request = authed(Request::builder().method("GET").uri("/items"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_get_unknown_item_is_404() {
    let router = test_router();
    let id = uuid::Uuid::now_v7().to_string();

    let (status, body) = send(&router, get_item(&id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_malformed_id_is_400() {
    let router = test_router();

    let (status, _body) = send(&router, get_item("not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_item_merges_fields() {
    let router = test_router();

    let (_, created) = send(&router, post_item(&valid_item_body())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let request = authed(Request::builder().method("PATCH").uri(format!("/items/{}", id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "title": "Updated Title" }).to_string()))
        .unwrap();

    let (status, updated) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated Title");
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["id"], created["id"]);
}

#[tokio::test]
async fn test_update_unknown_item_is_404() {
    let router = test_router();
    let id = uuid::Uuid::now_v7().to_string();

    let request = authed(Request::builder().method("PATCH").uri(format!("/items/{}", id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "title": "Updated Title" }).to_string()))
        .unwrap();

    let (status, _body) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_no_fields_is_422() {
    let router = test_router();

    let (_, created) = send(&router, post_item(&valid_item_body())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let request = authed(Request::builder().method("PATCH").uri(format!("/items/{}", id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let (status, _body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let router = test_router();

    let (_, created) = send(&router, post_item(&valid_item_body())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let request = authed(Request::builder().method("DELETE").uri(format!("/items/{}", id)))
        .body(Body::empty())
        .unwrap();
    let (status, _body) = send(&router, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) = send(&router, get_item(&id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_item_is_404() {
    let router = test_router();
    let id = uuid::Uuid::now_v7().to_string();

    let request = authed(Request::builder().method("DELETE").uri(format!("/items/{}", id)))
        .body(Body::empty())
        .unwrap();
    let (status, _body) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
