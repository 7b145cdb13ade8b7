use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use staybook_core::CoreError;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Storage failures surface as internal errors; the message is logged by the
/// API layer, never returned.
pub(crate) fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::InternalError(format!("database error: {}", err))
}
