use axum::{routing::get, Router};
use chrono::Duration;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::users::user_routes;
use crate::auth::{AuthService, JwtService};
use crate::services::UserService;

pub fn create_routes(db: SqlitePool, jwt_secret: &str, token_ttl: Duration) -> Router {
    let jwt_service = JwtService::new(jwt_secret, token_ttl);
    let auth_service = AuthService::new(db.clone(), jwt_service);
    let user_service = UserService::new(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes(auth_service))
        .merge(user_routes(user_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
