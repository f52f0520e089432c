//! Flogin API
//!
//! User registration and login with hashed credentials and bearer JWTs, plus
//! a product catalogue, served over HTTP with in-memory or PostgreSQL storage.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use sqlx::PgPool;
use tracing::{info, warn};

use api::state::AppState;
use config::{AuthConfig, DefaultUserConfig, StorageConfig};
use domain::product::ProductRepository;
use domain::user::UserRepository;
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::product::{
    InMemoryProductRepository, PostgresProductRepository, ProductService,
};
use infrastructure::storage::{connect_pool, run_storage_migrations, StorageType};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, RegisterUserRequest, UserService,
};

/// Create the application state with the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend: StorageType = config.storage.backend.parse()?;
    info!("Storage backend: {:?}", backend);

    let jwt_service = create_jwt_service(&config.auth);

    match backend {
        StorageType::InMemory => {
            assemble_state(
                InMemoryUserRepository::new(),
                InMemoryProductRepository::new(),
                jwt_service,
                config,
            )
            .await
        }
        StorageType::Postgres => {
            let pool = connect_postgres(&config.storage).await?;

            if config.storage.run_migrations {
                let applied = run_storage_migrations(&pool).await?;
                info!(applied, "Database migrations checked");
            }

            assemble_state(
                PostgresUserRepository::new(pool.clone()),
                PostgresProductRepository::new(pool),
                jwt_service,
                config,
            )
            .await
        }
    }
}

async fn assemble_state<U, P>(
    user_repository: U,
    product_repository: P,
    jwt_service: Arc<JwtService>,
    config: &AppConfig,
) -> anyhow::Result<AppState>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
{
    let user_service = create_user_service(Arc::new(user_repository), &config.auth);
    let product_service = ProductService::new(Arc::new(product_repository));

    if let Some(default_user) = &config.default_user {
        ensure_default_user(&user_service, default_user).await?;
    }

    Ok(AppState::new(
        Arc::new(user_service),
        Arc::new(product_service),
        jwt_service,
    ))
}

/// Build the user service with Argon2 hashing and the configured legacy policy
pub fn create_user_service<R: UserRepository>(
    repository: Arc<R>,
    auth: &AuthConfig,
) -> UserService<R, Argon2Hasher> {
    if auth.allow_legacy_plaintext {
        warn!("Legacy plaintext credentials are accepted; run `flogin migrate-credentials` to retire them");
    }

    UserService::new(repository, Arc::new(Argon2Hasher::new()))
        .with_legacy_plaintext(auth.allow_legacy_plaintext)
}

/// Open the PostgreSQL pool named by `storage.database_url`
pub async fn connect_postgres(storage: &StorageConfig) -> anyhow::Result<PgPool> {
    let database_url = storage.database_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("storage.database_url (or DATABASE_URL) is required for the postgres backend")
    })?;

    info!("Connecting to PostgreSQL...");
    let pool = connect_pool(database_url, storage.max_connections).await?;
    info!("PostgreSQL connection established");

    Ok(pool)
}

/// Create the JWT service from the configured secret, or a random one
pub fn create_jwt_service(auth: &AuthConfig) -> Arc<JwtService> {
    let secret = auth
        .jwt_secret
        .clone()
        .filter(|secret| !secret.trim().is_empty())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating random secret. \
                Tokens will NOT survive restarts. Set APP__AUTH__JWT_SECRET or JWT_SECRET."
            );
            generate_random_secret()
        });

    let previous_secrets = auth
        .previous_jwt_secrets
        .iter()
        .filter(|secret| !secret.trim().is_empty())
        .cloned()
        .collect();

    let config = JwtConfig::new(secret, u64::from(auth.jwt_expiration_hours))
        .with_previous_secrets(previous_secrets);

    Arc::new(JwtService::new(config))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Register the configured default user when it does not exist yet
async fn ensure_default_user<R: UserRepository>(
    user_service: &UserService<R, Argon2Hasher>,
    default_user: &DefaultUserConfig,
) -> anyhow::Result<()> {
    let request = RegisterUserRequest {
        username: default_user.username.clone(),
        password: default_user.password.clone(),
        full_name: default_user.full_name.clone(),
        email: default_user.email.clone(),
    };

    if let Some(user) = user_service.ensure_user(request).await? {
        info!(user_id = %user.id(), username = %user.username(), "Default user created");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, StoredCredential, User, UserId};
    use crate::infrastructure::auth::JwtGenerator;

    #[test]
    fn test_random_secret_shape() {
        let a = generate_random_secret();
        let b = generate_random_secret();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_jwt_service_uses_configured_expiry() {
        let auth = AuthConfig {
            jwt_secret: Some("configured-secret".to_string()),
            jwt_expiration_hours: 8,
            ..AuthConfig::default()
        };

        assert_eq!(create_jwt_service(&auth).expiration_hours(), 8);
    }

    #[test]
    fn test_blank_secret_is_not_used_for_signing() {
        let auth = AuthConfig {
            jwt_secret: Some(String::new()),
            previous_jwt_secrets: vec![String::new()],
            ..AuthConfig::default()
        };
        let service = create_jwt_service(&auth);
        let user = User::new(
            UserId::new(1),
            NewUser {
                username: "alice1".to_string(),
                credential: StoredCredential::hashed("$argon2id$hash"),
                full_name: None,
                email: None,
            },
        );
        let issued = service.generate(&user).unwrap();

        // A token signed with the empty key must not validate
        let empty_key = JwtService::new(JwtConfig::new("", 1));
        assert!(empty_key.validate(&issued.token).is_err());
        assert!(service.validate(&issued.token).is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_state_seeds_default_user_once() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("state-test-secret".to_string());
        config.default_user = Some(DefaultUserConfig {
            username: "admin".to_string(),
            password: "Admin123".to_string(),
            full_name: Some("Administrator".to_string()),
            email: None,
        });

        let state = create_app_state_with_config(&config).await.unwrap();
        let users = state.user_service.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username(), "admin");

        let user = state.user_service.login("admin", "Admin123").await.unwrap();
        assert_eq!(user.full_name(), Some("Administrator"));
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected() {
        let mut config = AppConfig::default();
        config.storage.backend = "mongo".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_postgres_requires_database_url() {
        let storage = StorageConfig {
            backend: "postgres".to_string(),
            database_url: None,
            ..StorageConfig::default()
        };

        let err = connect_postgres(&storage).await.unwrap_err();
        assert!(err.to_string().contains("database_url"));
    }
}
