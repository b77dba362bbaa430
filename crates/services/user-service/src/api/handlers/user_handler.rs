//! User handlers.
//!
//! Each handler parses its input, calls the [`UserService`](crate::service::UserService)
//! and maps the outcome onto a status code. Create, update and delete report
//! every non-input failure as a 500 with a fixed message; only the read-by-id
//! route answers 404.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult, PageRequest, PaginationQuery};
use domain::{parse_dob, UserResponse};

use crate::api::extractors::ValidatedJson;
use crate::api::handlers::method_not_allowed;
use crate::api::state::AppState;

/// Response header carrying the total number of users on list requests
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// User creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User display name
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Alice", min_length = 1, max_length = 100)]
    pub name: String,
    /// Date of birth (`YYYY-MM-DD`)
    #[serde(default)]
    #[validate(length(min = 1, message = "Date of birth is required"))]
    #[schema(example = "1990-05-10")]
    pub dob: String,
}

/// User update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Alice Smith", min_length = 1, max_length = 100)]
    pub name: String,
    /// New date of birth (`YYYY-MM-DD`)
    #[serde(default)]
    #[validate(length(min = 1, message = "Date of birth is required"))]
    #[schema(example = "1990-05-10")]
    pub dob: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users).post(create_user).fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
}

/// Parse a path identifier as a 32-bit integer.
fn parse_user_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>().map_err(|e| {
        tracing::error!(error = %e, id = raw, "Invalid user ID");
        AppError::bad_request("Invalid user ID")
    })
}

/// Early date-of-birth check so callers get the format message before any
/// service call. Uses the same parser as the service.
fn check_dob_format(dob: &str) -> AppResult<()> {
    parse_dob(dob).map(|_| ()).map_err(|e| {
        tracing::error!(dob, "Invalid date format");
        AppError::from(e)
    })
}

/// Keep input errors as they are; anything else becomes a 500 with `message`.
fn operation_failed(err: AppError, message: &'static str) -> AppError {
    if err.is_client_error() {
        tracing::error!(error = %err, "{}", message);
        return err;
    }
    tracing::error!(error = ?err, "{}", message);
    AppError::Failed(message)
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid body, field constraints or date format"),
        (status = 500, description = "Failed to create user")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    check_dob_format(&payload.dob)?;

    let record = state
        .user_service
        .create_user(payload.name, &payload.dob)
        .await
        .map_err(|e| operation_failed(e, "Failed to create user"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(record))))
}

/// List users, one page at a time
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number; values below 1 fall back to 1"),
        ("page_size" = Option<u64>, Query, description = "Page size in [1, 100]; other values fall back to 20")
    ),
    responses(
        (status = 200, description = "Page of users; total count in the x-total-count header", body = Vec<UserResponse>),
        (status = 500, description = "Failed to list users")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Option<Query<PaginationQuery>>,
) -> AppResult<impl IntoResponse> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let page = PageRequest::from_query(&query);

    let (users, total) = state
        .user_service
        .list_users(page.page, page.page_size)
        .await
        .map_err(|e| operation_failed(e, "Failed to list users"))?;

    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok((
        StatusCode::OK,
        [(TOTAL_COUNT_HEADER, total.to_string())],
        Json(body),
    ))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;

    let record = state.user_service.get_user(id).await.map_err(|e| {
        tracing::error!(error = ?e, user_id = id, "User not found");
        AppError::not_found("User")
    })?;

    Ok(Json(UserResponse::from(record)))
}

/// Update user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid ID, body, field constraints or date format"),
        (status = 500, description = "Failed to update user (including unknown IDs)")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<ValidatedJson<UpdateUserRequest>, AppError>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;
    let ValidatedJson(payload) = payload?;
    check_dob_format(&payload.dob)?;

    let record = state
        .user_service
        .update_user(id, payload.name, &payload.dob)
        .await
        .map_err(|e| operation_failed(e, "Failed to update user"))?;

    Ok(Json(UserResponse::from(record)))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, description = "Invalid user ID"),
        (status = 500, description = "Failed to delete user (including unknown IDs)")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_user_id(&id)?;

    state
        .user_service
        .delete_user(id)
        .await
        .map_err(|e| operation_failed(e, "Failed to delete user"))?;

    Ok(StatusCode::NO_CONTENT)
}
