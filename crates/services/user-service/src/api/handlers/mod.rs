//! HTTP request handlers.

pub mod fallback_handler;
pub mod health_handler;
pub mod user_handler;

pub use fallback_handler::{method_not_allowed, route_not_found};
pub use health_handler::health_check;
pub use user_handler::user_routes;
