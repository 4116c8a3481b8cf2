use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::models::{validate_email, CreateUser, MessageResponse, UserResponse};
use crate::services::{UserError, UserService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

pub fn user_routes(user_service: UserService) -> Router {
    Router::new()
        .route("/users/", post(create_user).get(read_users))
        .route(
            "/users/:user_id",
            get(read_user).put(update_user).delete(delete_user),
        )
        .with_state(user_service)
}

/// Create a user with its address, geo and company
#[tracing::instrument(skip(user_service, user))]
async fn create_user(
    State(user_service): State<UserService>,
    Json(user): Json<CreateUser>,
) -> Result<Json<UserResponse>, UserError> {
    validate_email(&user.email).map_err(|e| UserError::Validation(e.to_string()))?;
    let response = user_service.create_user(user).await?;
    Ok(Json(response))
}

/// List users with offset/limit pagination
#[tracing::instrument(skip(user_service))]
async fn read_users(
    State(user_service): State<UserService>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserResponse>>, UserError> {
    let users = user_service.list_users(query.skip, query.limit).await?;
    Ok(Json(users))
}

/// Fetch a single user by id
#[tracing::instrument(skip(user_service))]
async fn read_user(
    State(user_service): State<UserService>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, UserError> {
    let user = user_service
        .get_user(user_id)
        .await?
        .ok_or(UserError::NotFound)?;
    Ok(Json(user))
}

/// Whole-resource update of an existing user
#[tracing::instrument(skip(user_service, user))]
async fn update_user(
    State(user_service): State<UserService>,
    Path(user_id): Path<i64>,
    Json(user): Json<CreateUser>,
) -> Result<Json<UserResponse>, UserError> {
    validate_email(&user.email).map_err(|e| UserError::Validation(e.to_string()))?;
    let response = user_service.update_user(user_id, user).await?;
    Ok(Json(response))
}

/// Delete a user and its owned sub-entities
#[tracing::instrument(skip(user_service))]
async fn delete_user(
    State(user_service): State<UserService>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, UserError> {
    user_service.delete_user(user_id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
