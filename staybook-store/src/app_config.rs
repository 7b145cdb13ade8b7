use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Absent means session tokens carry no expiry.
    pub session_ttl_seconds: Option<u64>,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_true")]
    pub uniform_login_errors: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `STAYBOOK__AUTH__JWT_SECRET=...` sets `auth.jwt_secret`
            .add_source(
                config::Environment::with_prefix("STAYBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let raw = r#"
            [server]
            port = 4000
            [database]
            url = "postgres://localhost/test"
            [auth]
            jwt_secret = "s"
            [uploads]
            dir = "uploads"
            public_base_url = "http://localhost:4000"
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.auth.session_ttl_seconds.is_none());
        assert!(config.auth.uniform_login_errors);
        assert!(!config.auth.cookie_secure);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_memory_backend_and_ttl() {
        let raw = r#"
            [server]
            port = 8080
            [database]
            url = ""
            [storage]
            backend = "memory"
            [auth]
            jwt_secret = "s"
            session_ttl_seconds = 3600
            [uploads]
            dir = "/tmp/up"
            public_base_url = "http://example.com"
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.session_ttl_seconds, Some(3600));
    }
}
