use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    /// User registered at startup when absent
    pub default_user: Option<DefaultUserConfig>,
    pub cors: CorsConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Apply pending migrations when the server starts
    pub run_migrations: bool,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    /// Retired signing secrets still accepted when validating tokens
    pub previous_jwt_secrets: Vec<String>,
    pub jwt_expiration_hours: u32,
    /// Accept passwords stored as plaintext by older deployments
    pub allow_legacy_plaintext: bool,
}

#[derive(Clone, Deserialize)]
pub struct DefaultUserConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            run_migrations: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            previous_jwt_secrets: Vec::new(),
            jwt_expiration_hours: 1,
            allow_legacy_plaintext: false,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("previous_jwt_secrets", &self.previous_jwt_secrets.len())
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("allow_legacy_plaintext", &self.allow_legacy_plaintext)
            .finish()
    }
}

impl std::fmt::Debug for DefaultUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultUserConfig")
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .finish()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config/default`, `config/local`, an optional
    /// explicit file, then `APP__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.previous_jwt_secrets")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(app_config)
    }

    /// Honour the conventional `DATABASE_URL` and `JWT_SECRET` variables
    /// when the matching settings are absent. Blank secrets count as absent.
    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.storage.database_url.is_none() {
            self.storage.database_url = lookup("DATABASE_URL");
        }
        self.auth.jwt_secret = non_blank(self.auth.jwt_secret.take())
            .or_else(|| non_blank(lookup("JWT_SECRET")));
        self.auth
            .previous_jwt_secrets
            .retain(|secret| !secret.trim().is_empty());
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.auth.jwt_expiration_hours, 1);
        assert!(!config.auth.allow_legacy_plaintext);
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
        assert!(config.default_user.is_none());
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 9000

            [auth]
            allow_legacy_plaintext = true
            previous_jwt_secrets = ["old-1", "old-2"]

            [logging]
            format = "json"
            "#,
        );

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.auth.allow_legacy_plaintext);
        assert_eq!(config.auth.previous_jwt_secrets.len(), 2);
        assert_eq!(config.auth.jwt_expiration_hours, 1);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_default_user_section() {
        let config = from_toml(
            r#"
            [default_user]
            username = "admin"
            password = "Admin123"
            "#,
        );

        let user = config.default_user.unwrap();
        assert_eq!(user.username, "admin");
        assert!(user.full_name.is_none());
        assert!(!format!("{:?}", user).contains("Admin123"));
    }

    #[test]
    fn test_env_fallbacks_only_fill_missing_values() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("configured".to_string());

        config.apply_env_fallbacks(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/flogin".to_string()),
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://localhost/flogin")
        );
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("configured"));
    }

    #[test]
    fn test_blank_secrets_count_as_absent() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("   ".to_string());
        config.auth.previous_jwt_secrets =
            vec!["old-1".to_string(), "".to_string(), " ".to_string()];

        config.apply_env_fallbacks(|key| match key {
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
        assert_eq!(config.auth.previous_jwt_secrets, vec!["old-1".to_string()]);

        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some(String::new());
        config.apply_env_fallbacks(|key| match key {
            "JWT_SECRET" => Some("  ".to_string()),
            _ => None,
        });
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_auth_debug_hides_secret() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("top-secret".to_string());

        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
