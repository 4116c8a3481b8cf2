use sqlx::SqlitePool;

use crate::auth::password::verify_password;
use crate::auth::{AuthError, JwtService, TokenRequest, TokenResponse};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool, jwt_service: JwtService) -> Self {
        Self { jwt_service, db }
    }

    /// Exchange a username/password pair for a bearer token. Whether the
    /// username or the password was wrong is not revealed.
    pub async fn login(&self, request: TokenRequest) -> Result<TokenResponse, AuthError> {
        let user = self
            .get_user_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.jwt_service.create_access_token(&user.username)?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, password_hash, phone, website
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(user)
    }
}
