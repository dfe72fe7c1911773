use std::env;
use std::fmt;

use auth::AuthSettings;
use auth::HashingCost;
use auth::SettingsError;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Without a database section the service runs on the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_seconds: i64,
    #[serde(default)]
    pub hashing: HashingCost,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

fn default_max_connections() -> u32 {
    5
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("hashing", &self.hashing)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    /// Build the immutable authentication settings shared by every request.
    ///
    /// # Errors
    /// * `SecretTooShort` - `auth.secret` is shorter than 32 bytes
    /// * `InvalidTokenTtl` - `auth.token_ttl_seconds` is not positive or exceeds one year
    /// * `HashingCost` - `auth.hashing` is rejected by Argon2
    pub fn auth_settings(&self) -> Result<AuthSettings, SettingsError> {
        let token_ttl = chrono::Duration::try_seconds(self.auth.token_ttl_seconds)
            .ok_or(SettingsError::InvalidTokenTtl(self.auth.token_ttl_seconds))?;

        AuthSettings::new(self.auth.secret.as_bytes(), token_ttl, self.auth.hashing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_ttl(secret: &str, token_ttl_seconds: i64) -> Config {
        Config {
            server: ServerConfig { http_port: 3000 },
            database: None,
            auth: AuthConfig {
                secret: secret.to_string(),
                token_ttl_seconds,
                hashing: HashingCost::default(),
            },
            feed: FeedConfig::default(),
        }
    }

    fn config(secret: &str) -> Config {
        config_with_ttl(secret, 3600)
    }

    #[test]
    fn test_load_reads_environment_overrides() {
        env::set_var("AUTH__SECRET", "secret-from-environment-at-least-32-bytes");
        env::set_var("SERVER__HTTP_PORT", "4321");

        let config = Config::load().expect("Configuration should load");

        assert_eq!(config.auth.secret, "secret-from-environment-at-least-32-bytes");
        assert_eq!(config.server.http_port, 4321);
        assert_eq!(config.auth.token_ttl_seconds, 3600);
    }

    #[test]
    fn test_auth_settings_rejects_unrepresentable_ttl() {
        let result = config_with_ttl("test-secret-key-for-token-signing-32b", i64::MAX)
            .auth_settings();

        assert!(matches!(result, Err(SettingsError::InvalidTokenTtl(i64::MAX))));
    }

    #[test]
    fn test_auth_settings_rejects_ttl_over_one_year() {
        let result = config_with_ttl("test-secret-key-for-token-signing-32b", 10_000_000_000_000)
            .auth_settings();

        assert!(matches!(result, Err(SettingsError::InvalidTokenTtl(_))));
    }

    #[test]
    fn test_auth_settings_from_config() {
        let settings = config("test-secret-key-for-token-signing-32b")
            .auth_settings()
            .expect("Settings should be valid");

        assert_eq!(settings.token_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_auth_settings_rejects_short_secret() {
        let result = config("too-short").auth_settings();

        assert!(matches!(result, Err(SettingsError::SecretTooShort { .. })));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config("test-secret-key-for-token-signing-32b"));

        assert!(!rendered.contains("test-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
