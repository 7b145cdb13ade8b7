use async_trait::async_trait;
use sqlx::PgPool;
use staybook_core::repository::IdentityRepository;
use staybook_core::{CoreError, CoreResult};
use staybook_shared::Identity;
use uuid::Uuid;

use crate::database::storage_error;

pub struct StoreIdentityRepository {
    pool: PgPool,
}

impl StoreIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl IdentityRepository for StoreIdentityRepository {
    async fn insert(&self, identity: &Identity) -> CoreResult<()> {
        sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(identity.id)
            .bind(&identity.name)
            .bind(&identity.email)
            .bind(&identity.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    CoreError::DuplicateEmail
                }
                other => storage_error(other),
            })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Identity::from))
    }

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, name, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Identity::from))
    }
}
