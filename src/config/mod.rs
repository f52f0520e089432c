//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CorsConfig, DefaultUserConfig, LogFormat, LoggingConfig,
    MetricsConfig, ServerConfig, StorageConfig,
};
