//! Path parameter parsing

use std::str::FromStr;

use super::ApiError;

/// Parse a numeric resource id from a path segment
pub fn parse_id<T: FromStr>(raw: &str, resource: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id '{}'", resource, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_numeric_id() {
        let id: UserId = parse_id("42", "user").unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_reject_non_numeric_id() {
        let err = parse_id::<UserId>("abc", "user").unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.message, "Invalid user id 'abc'");
    }
}
