use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] crate::auth::password::PasswordError),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            UserError::EmailTaken => (StatusCode::BAD_REQUEST, "Email already registered"),
            UserError::UsernameTaken => (StatusCode::BAD_REQUEST, "Username already taken"),
            UserError::NotFound => (StatusCode::NOT_FOUND, "User not found"),
            UserError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Validation error"),
            UserError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            UserError::PasswordHashing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Password processing error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
