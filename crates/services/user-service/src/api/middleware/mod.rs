//! Middleware for request correlation and request logging.

mod request_logger;

pub use request_logger::{make_request_span, request_id, request_logger};
