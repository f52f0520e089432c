//! Authentication API endpoints
//!
//! Login issues a bearer JWT; `me` resolves the user behind a valid token.

use axum::{extract::State, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: the public profile plus the issued token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Login with username and password
///
/// POST /users/login, POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!(username = %request.username, "Login attempt");

    let user = state
        .user_service
        .login(&request.username, &request.password)
        .await?;

    let issued = state.jwt_service.generate(&user)?;

    Ok(Json(LoginResponse {
        user,
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
    }))
}

/// Get current authenticated user
///
/// GET /users/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}
