use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use staybook_core::repository::{BookingRepository, IdentityRepository, PlaceRepository};
use staybook_core::{AccountService, BookingService, PlaceService, SessionAuthenticator};
use staybook_store::app_config::Config;

#[derive(Clone)]
pub struct AuthSettings {
    pub cookie_secure: bool,
    pub uniform_login_errors: bool,
}

#[derive(Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub public_base_url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub places: Arc<PlaceService>,
    pub bookings: Arc<BookingService>,
    pub auth: AuthSettings,
    pub uploads: UploadSettings,
    pub cors_origins: Vec<String>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: &Config,
        identities: Arc<dyn IdentityRepository>,
        places: Arc<dyn PlaceRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> anyhow::Result<Self> {
        let sessions = Arc::new(SessionAuthenticator::new(
            &config.auth.jwt_secret,
            config.auth.session_ttl_seconds,
        )?);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            accounts: Arc::new(AccountService::new(identities, sessions)?),
            places: Arc::new(PlaceService::new(places.clone())),
            bookings: Arc::new(BookingService::new(bookings, places)),
            auth: AuthSettings {
                cookie_secure: config.auth.cookie_secure,
                uniform_login_errors: config.auth.uniform_login_errors,
            },
            uploads: UploadSettings {
                dir: PathBuf::from(&config.uploads.dir),
                public_base_url: config
                    .uploads
                    .public_base_url
                    .trim_end_matches('/')
                    .to_string(),
            },
            cors_origins: config.cors.allowed_origins.clone(),
            http,
        })
    }
}
