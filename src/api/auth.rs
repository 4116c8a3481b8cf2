use axum::{extract::State, response::Json, routing::post, Form, Router};

use crate::auth::{AuthError, AuthService, TokenRequest, TokenResponse};

pub fn auth_routes(auth_service: AuthService) -> Router {
    Router::new()
        .route("/token", post(login_for_access_token))
        .with_state(auth_service)
}

/// Exchange form credentials for a bearer token
#[tracing::instrument(skip(auth_service, request))]
async fn login_for_access_token(
    State(auth_service): State<AuthService>,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}
