use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{AddressPayload, CompanyPayload, CreateUser};
use crate::services::UserService;

/// Password assigned to every remotely seeded user.
pub const DEFAULT_SEED_PASSWORD: &str = "password123";

/// One record of the remote seed source. The remote objects carry extra
/// fields (notably their own `id`), which are ignored.
#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    username: String,
    email: String,
    phone: String,
    website: String,
    address: AddressPayload,
    company: CompanyPayload,
}

impl SeedUser {
    fn into_create(self, password: &str) -> CreateUser {
        CreateUser {
            name: self.name,
            username: self.username,
            email: self.email,
            password: password.to_string(),
            phone: self.phone,
            website: self.website,
            address: self.address,
            company: self.company,
        }
    }
}

pub struct DatabaseSeeder {
    user_service: UserService,
    seed_url: String,
    http: reqwest::Client,
}

impl DatabaseSeeder {
    pub fn new(pool: SqlitePool, seed_url: String) -> Self {
        Self {
            user_service: UserService::new(pool),
            seed_url,
            http: reqwest::Client::new(),
        }
    }

    /// Populate an empty store from the remote source. A no-op once the
    /// store contains any user. Each record commits independently, so a
    /// failure partway through leaves the already-committed prefix intact.
    pub async fn seed(&self) -> Result<()> {
        if self.user_service.count_users().await? > 0 {
            tracing::debug!("Users table already populated, skipping seeding");
            return Ok(());
        }

        tracing::info!(url = %self.seed_url, "Seeding users from remote source");

        let records: Vec<SeedUser> = self
            .http
            .get(&self.seed_url)
            .send()
            .await
            .context("fetching seed data")?
            .error_for_status()
            .context("fetching seed data")?
            .json()
            .await
            .context("parsing seed data")?;

        let mut seeded = 0usize;
        for record in records {
            let username = record.username.clone();
            self.user_service
                .create_user(record.into_create(DEFAULT_SEED_PASSWORD))
                .await
                .with_context(|| format!("seeding user {username}"))?;
            seeded += 1;
        }

        tracing::info!("Seeded {seeded} users");
        Ok(())
    }
}
