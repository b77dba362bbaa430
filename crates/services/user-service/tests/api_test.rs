//! Integration tests for the HTTP API.
//!
//! The full router (middleware included) runs against an in-memory store, so
//! no database is required.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, AppResult};
use domain::{FixedClock, User};
use user_service_lib::api::{create_router, AppState};
use user_service_lib::repository::UserRepository;
use user_service_lib::service::UserManager;

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
struct InMemoryUsers {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, name: String, dob: NaiveDate) -> AppResult<User> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            name,
            dob,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn update(&self, id: i32, name: String, dob: NaiveDate) -> AppResult<User> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.name = name;
        user.dob = dob;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("User"))
    }

    async fn list(&self, page: u64, page_size: u64) -> AppResult<Vec<User>> {
        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.inner.lock().unwrap().rows.len() as u64)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
}

fn test_app() -> Router {
    let repo = Arc::new(InMemoryUsers::default());
    let service = UserManager::with_clock(repo, Arc::new(FixedClock(today())));
    create_router(AppState::new(Arc::new(service)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, name: &str, dob: &str) -> Value {
    let response = send(app, Method::POST, "/users", Some(json!({ "name": name, "dob": dob }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_age() {
    let app = test_app();

    let body = create(&app, "Alice", "1990-05-10").await;

    assert_eq!(body, json!({ "id": 1, "name": "Alice", "dob": "1990-05-10", "age": 35 }));
}

#[tokio::test]
async fn test_create_user_invalid_date() {
    let app = test_app();

    for dob in ["1990-13-01", "10-05-1990", "1990-2-3", "2023-02-29"] {
        let response = send(&app, Method::POST, "/users", Some(json!({ "name": "Alice", "dob": dob }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "dob {}", dob);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid date format. Expected format: YYYY-MM-DD" })
        );
    }
}

#[tokio::test]
async fn test_create_user_future_date() {
    let app = test_app();

    let response = send(&app, Method::POST, "/users", Some(json!({ "name": "Alice", "dob": "2025-05-11" }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Date of birth cannot be in the future" })
    );
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = test_app();

    let response = send(&app, Method::POST, "/users", Some(json!({}))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Date of birth is required, Name must be between 1 and 100 characters" })
    );
}

#[tokio::test]
async fn test_create_user_name_too_long() {
    let app = test_app();

    let response = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "x".repeat(101), "dob": "1990-05-10" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_malformed_body() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid request body" }));
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_get_user() {
    let app = test_app();
    create(&app, "Bob", "1990-12-31").await;

    let response = send(&app, Method::GET, "/users/1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "name": "Bob", "dob": "1990-12-31", "age": 34 })
    );
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = test_app();

    let response = send(&app, Method::GET, "/users/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_get_user_invalid_id() {
    let app = test_app();

    let response = send(&app, Method::GET, "/users/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid user ID" }));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_user() {
    let app = test_app();
    create(&app, "Carol", "1990-01-01").await;

    let response = send(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({ "name": "Carol Smith", "dob": "2000-06-15" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "name": "Carol Smith", "dob": "2000-06-15", "age": 24 })
    );

    let response = send(&app, Method::GET, "/users/1", None).await;
    assert_eq!(body_json(response).await["name"], "Carol Smith");
}

#[tokio::test]
async fn test_update_missing_user_fails() {
    let app = test_app();

    let response = send(
        &app,
        Method::PUT,
        "/users/99",
        Some(json!({ "name": "Nobody", "dob": "1990-01-01" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "Failed to update user" }));
}

#[tokio::test]
async fn test_update_checks_id_before_body() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/users/abc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("garbage"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid user ID" }));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_user() {
    let app = test_app();
    create(&app, "Dan", "1985-03-20").await;

    let response = send(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let response = send(&app, Method::GET, "/users/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_user_fails() {
    let app = test_app();

    let response = send(&app, Method::DELETE, "/users/7", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "Failed to delete user" }));
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_users_pagination() {
    let app = test_app();
    for i in 0..25 {
        create(&app, &format!("user-{}", i), "1990-05-10").await;
    }

    let response = send(&app, Method::GET, "/users", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "25");
    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 20);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["age"], 35);

    let body = body_json(send(&app, Method::GET, "/users?page=2", None).await).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 5);
    assert_eq!(users[0]["id"], 21);

    let body = body_json(send(&app, Method::GET, "/users?page=2&page_size=10", None).await).await;
    assert_eq!(body.as_array().unwrap()[0]["id"], 11);
}

#[tokio::test]
async fn test_list_users_falls_back_on_bad_params() {
    let app = test_app();
    for i in 0..25 {
        create(&app, &format!("user-{}", i), "1990-05-10").await;
    }

    // Out of range page size falls back to 20, page below 1 falls back to 1
    let body = body_json(send(&app, Method::GET, "/users?page=0&page_size=500", None).await).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 20);
    assert_eq!(users[0]["id"], 1);

    let body = body_json(send(&app, Method::GET, "/users?page=abc&page_size=-3", None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_list_users_huge_page_is_empty() {
    let app = test_app();
    create(&app, "Eve", "1990-05-10").await;

    let response = send(&app, Method::GET, "/users?page=100000000000000000&page_size=100", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "1");
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_list_users_empty() {
    let app = test_app();

    let response = send(&app, Method::GET, "/users", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "0");
    assert_eq!(body_json(response).await, json!([]));
}

// =============================================================================
// Health and middleware
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_request_id_not_echoed() {
    let app = test_app();

    let response = send(&app, Method::GET, "/health", None).await;

    assert!(response.headers().get("x-request-id").is_none());
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = test_app();

    let response = send(&app, Method::GET, "/accounts", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn test_wrong_method_returns_json_405() {
    let app = test_app();

    let response = send(&app, Method::PATCH, "/users/1", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));

    let response = send(&app, Method::DELETE, "/users", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
