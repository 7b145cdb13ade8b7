use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use staybook_api::{app, state::AppState};
use staybook_core::memory::{
    MemoryBookingRepository, MemoryIdentityRepository, MemoryPlaceRepository,
};
use staybook_core::repository::{BookingRepository, IdentityRepository, PlaceRepository};
use staybook_store::app_config::{Config, StorageBackend};
use staybook_store::{
    DbClient, StoreBookingRepository, StoreIdentityRepository, StorePlaceRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn IdentityRepository>,
    Arc<dyn PlaceRepository>,
    Arc<dyn BookingRepository>,
);

async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database.url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            let identities: Arc<dyn IdentityRepository> =
                Arc::new(StoreIdentityRepository::new(db.pool.clone()));
            let places: Arc<dyn PlaceRepository> =
                Arc::new(StorePlaceRepository::new(db.pool.clone()));
            let bookings: Arc<dyn BookingRepository> =
                Arc::new(StoreBookingRepository::new(db.pool));
            Ok((identities, places, bookings))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let identities: Arc<dyn IdentityRepository> = Arc::new(MemoryIdentityRepository::new());
            let places: Arc<dyn PlaceRepository> = Arc::new(MemoryPlaceRepository::new());
            let bookings: Arc<dyn BookingRepository> = Arc::new(MemoryBookingRepository::new());
            Ok((identities, places, bookings))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "staybook_api=debug,staybook_core=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Staybook API on port {}", config.server.port);

    if !tokio::fs::try_exists(&config.uploads.dir).await.unwrap_or(false) {
        tokio::fs::create_dir_all(&config.uploads.dir).await?;
        tracing::info!("Created uploads directory {}", config.uploads.dir);
    }

    let (identities, places, bookings) = repositories(&config).await?;
    let app_state = AppState::new(&config, identities, places, bookings)?;

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
