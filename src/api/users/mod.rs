//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::auth;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::user::{User, UserId};
use crate::infrastructure::user::{RegisterUserRequest, UpdateUserRequest};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register_user))
        .route("/login", post(auth::login))
        .route("/me", get(auth::get_current_user))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Registration body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserApiRequest {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl From<RegisterUserApiRequest> for RegisterUserRequest {
    fn from(request: RegisterUserApiRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            full_name: request.full_name,
            email: request.email,
        }
    }
}

/// Partial update body; omitted or blank fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserApiRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserApiRequest> for UpdateUserRequest {
    fn from(request: UpdateUserApiRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            full_name: request.full_name,
            email: request.email,
        }
    }
}

/// POST /users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserApiRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    debug!(username = %request.username, "Registering user");

    let user = state.user_service.register(request.into()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing users");

    Ok(Json(state.user_service.list().await?))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&user_id, "user")?;
    debug!(user_id = %id, "Getting user");

    Ok(Json(state.user_service.get(id).await?))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&user_id, "user")?;
    debug!(user_id = %id, "Updating user");

    Ok(Json(state.user_service.update(id, request.into()).await?))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: UserId = parse_id(&user_id, "user")?;
    debug!(user_id = %id, "Deleting user");

    state.user_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
