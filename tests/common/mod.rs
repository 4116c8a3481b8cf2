use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use jsonplaceholder_api::api::routes::create_routes;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

/// In-memory SQLite pool with the crate's migrations applied. A single
/// connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_app(pool: SqlitePool) -> Router {
    create_routes(pool, TEST_JWT_SECRET, Duration::minutes(30))
}

pub fn user_payload(username: &str, email: &str) -> Value {
    json!({
        "name": "Test User",
        "username": username,
        "email": email,
        "password": "password123",
        "phone": "123-456-7890",
        "website": "test.com",
        "address": {
            "street": "Test Street",
            "suite": "Test Suite",
            "city": "Test City",
            "zipcode": "12345",
            "geo": {
                "lat": "0",
                "lng": "0"
            }
        },
        "company": {
            "name": "Test Company",
            "catchPhrase": "Test Phrase",
            "bs": "Test BS"
        }
    })
}
