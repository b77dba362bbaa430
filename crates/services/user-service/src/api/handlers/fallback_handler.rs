//! Fallbacks so unmatched requests still get a JSON error body.

use common::AppError;

/// No route matches the path.
pub async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// The path exists but not for this method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
