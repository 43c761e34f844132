use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub turnstile: TurnstileConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Lead persistence backend. An empty `url` means no database is bound and
/// the service falls back to log-only persistence.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    /// Transactional provider API key. Empty disables notifications.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_contact_address")]
    pub contact_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider_url: default_provider_url(),
            from_address: default_from_address(),
            contact_address: default_contact_address(),
        }
    }
}

fn default_provider_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from_address() -> String {
    "Meridian Advisory <website@meridianadvisory.com>".to_string()
}

fn default_contact_address() -> String {
    "hello@meridianadvisory.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TurnstileConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

impl Default for TurnstileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            secret_key: String::new(),
            verify_url: default_verify_url(),
        }
    }
}

fn default_verify_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (RESEND_API_KEY, CONTACT_EMAIL, DATABASE_URL)
    /// 2. Environment variables (INTAKE__EMAIL__API_KEY, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8787)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("INTAKE")
                .separator("__")
                .try_parsing(true),
        );

        // The variables the original deployments were configured with
        if let Ok(api_key) = env::var("RESEND_API_KEY") {
            builder = builder.set_override("email.api_key", api_key)?;
        }
        if let Ok(contact_email) = env::var("CONTACT_EMAIL") {
            builder = builder.set_override("email.contact_address", contact_email)?;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(secret_key) = env::var("TURNSTILE_SECRET_KEY") {
            builder = builder.set_override("turnstile.secret_key", secret_key)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.turnstile.enabled && self.turnstile.secret_key.is_empty() {
            return Err("Turnstile is enabled but no secret key is configured".to_string());
        }
        if self.email.contact_address.is_empty() {
            return Err("Contact address must not be empty".to_string());
        }
        Ok(())
    }
}
