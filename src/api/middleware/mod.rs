//! API middleware components

pub mod logging;
pub mod metrics;
pub mod security;
pub mod user_auth;

pub use logging::{logging_middleware, redact_json_sensitive_fields, truncate_for_log};
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
pub use user_auth::{extract_jwt_token, RequireUser};
