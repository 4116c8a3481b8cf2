use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::models::{CreateUser, UserAggregateRow, UserResponse};
use crate::services::UserError;

const AGGREGATE_SELECT: &str = "SELECT u.id, u.name, u.username, u.email, u.phone, u.website,
            a.street, a.suite, a.city, a.zipcode,
            g.lat, g.lng,
            c.name AS company_name, c.catch_phrase, c.bs
     FROM users u
     JOIN addresses a ON a.user_id = u.id
     JOIN geos g ON g.address_id = a.id
     JOIN companies c ON c.user_id = u.id";

/// CRUD over the user aggregate: a user row plus its owned address, geo and
/// company rows, created and deleted as one unit.
#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the full aggregate in one transaction. Fails without partial
    /// mutation when the username or email is already taken.
    pub async fn create_user(&self, data: CreateUser) -> Result<UserResponse, UserError> {
        let password_hash = hash_password(&data.password)?;

        let mut tx = self.db.begin().await?;

        let email_taken = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(&data.email)
            .fetch_optional(&mut *tx)
            .await?;
        if email_taken.is_some() {
            return Err(UserError::EmailTaken);
        }

        let username_taken = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?")
            .bind(&data.username)
            .fetch_optional(&mut *tx)
            .await?;
        if username_taken.is_some() {
            return Err(UserError::UsernameTaken);
        }

        let user_id = sqlx::query(
            "INSERT INTO users (name, username, email, password_hash, phone, website)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.phone)
        .bind(&data.website)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?
        .last_insert_rowid();

        let address_id = sqlx::query(
            "INSERT INTO addresses (user_id, street, suite, city, zipcode)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&data.address.street)
        .bind(&data.address.suite)
        .bind(&data.address.city)
        .bind(&data.address.zipcode)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("INSERT INTO geos (address_id, lat, lng) VALUES (?, ?, ?)")
            .bind(address_id)
            .bind(&data.address.geo.lat)
            .bind(&data.address.geo.lng)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO companies (user_id, name, catch_phrase, bs) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(&data.company.name)
            .bind(&data.company.catch_phrase)
            .bind(&data.company.bs)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(UserResponse {
            id: user_id,
            name: data.name,
            username: data.username,
            email: data.email,
            phone: data.phone,
            website: data.website,
            address: data.address,
            company: data.company,
        })
    }

    /// Point lookup of the full aggregate; absence is a normal empty result
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserResponse>, UserError> {
        let row = sqlx::query_as::<_, UserAggregateRow>(&format!(
            "{AGGREGATE_SELECT} WHERE u.id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserResponse::from))
    }

    /// List users in insertion (id) order. Out-of-range skip/limit clamp
    /// rather than error.
    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<UserResponse>, UserError> {
        let rows = sqlx::query_as::<_, UserAggregateRow>(&format!(
            "{AGGREGATE_SELECT} ORDER BY u.id LIMIT ? OFFSET ?"
        ))
        .bind(limit.max(0))
        .bind(skip.max(0))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(UserResponse::from).collect())
    }

    /// Whole-resource replace of an existing aggregate, editing the rows in
    /// place. A missing address (and its geo) or company is skipped rather
    /// than created. The password field of the payload is ignored.
    pub async fn update_user(
        &self,
        user_id: i64,
        data: CreateUser,
    ) -> Result<UserResponse, UserError> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(UserError::NotFound);
        }

        let email_taken =
            sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ? AND id != ?")
                .bind(&data.email)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if email_taken.is_some() {
            return Err(UserError::EmailTaken);
        }

        let username_taken =
            sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ? AND id != ?")
                .bind(&data.username)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if username_taken.is_some() {
            return Err(UserError::UsernameTaken);
        }

        sqlx::query(
            "UPDATE users SET name = ?, username = ?, email = ?, phone = ?, website = ?
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.website)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let address_id =
            sqlx::query_scalar::<_, i64>("SELECT id FROM addresses WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(address_id) = address_id {
            sqlx::query(
                "UPDATE addresses SET street = ?, suite = ?, city = ?, zipcode = ? WHERE id = ?",
            )
            .bind(&data.address.street)
            .bind(&data.address.suite)
            .bind(&data.address.city)
            .bind(&data.address.zipcode)
            .bind(address_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE geos SET lat = ?, lng = ? WHERE address_id = ?")
                .bind(&data.address.geo.lat)
                .bind(&data.address.geo.lng)
                .bind(address_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE companies SET name = ?, catch_phrase = ?, bs = ? WHERE user_id = ?")
            .bind(&data.company.name)
            .bind(&data.company.catch_phrase)
            .bind(&data.company.bs)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_user(user_id).await?.ok_or(UserError::NotFound)
    }

    /// Delete the aggregate. The address, its geo, and the company go with
    /// the user row in the same transaction. A second delete of the same id
    /// is NotFound.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), UserError> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(UserError::NotFound);
        }

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64, UserError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}

/// Concurrent duplicate creates race at the unique constraints; the loser's
/// insert surfaces here instead of at the pre-checks.
fn map_unique_violation(err: sqlx::Error) -> UserError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return if db_err.message().contains("users.email") {
                UserError::EmailTaken
            } else {
                UserError::UsernameTaken
            };
        }
    }
    UserError::Database(err)
}
