//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod path;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use path::parse_id;
