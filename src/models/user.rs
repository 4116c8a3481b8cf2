use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted user row. The password hash never leaves the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPayload {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressPayload {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: GeoPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyPayload {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

/// Request body for user creation and whole-resource update
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub website: String,
    pub address: AddressPayload,
    pub company: CompanyPayload,
}

/// Response shape: the create/update payload with `id` added and the
/// password removed
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: AddressPayload,
    pub company: CompanyPayload,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Flattened four-table join row, reassembled into a `UserResponse`
#[derive(Debug, FromRow)]
pub struct UserAggregateRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub lat: String,
    pub lng: String,
    pub company_name: String,
    pub catch_phrase: String,
    pub bs: String,
}

impl From<UserAggregateRow> for UserResponse {
    fn from(row: UserAggregateRow) -> Self {
        UserResponse {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            phone: row.phone,
            website: row.website,
            address: AddressPayload {
                street: row.street,
                suite: row.suite,
                city: row.city,
                zipcode: row.zipcode,
                geo: GeoPayload {
                    lat: row.lat,
                    lng: row.lng,
                },
            },
            company: CompanyPayload {
                name: row.company_name,
                catch_phrase: row.catch_phrase,
                bs: row.bs,
            },
        }
    }
}
