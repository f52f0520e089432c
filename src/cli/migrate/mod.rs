//! Database maintenance commands

use std::path::Path;

use anyhow::bail;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::{
    run_storage_migrations, storage_migrations, PostgresMigrator, StorageType,
};
use crate::infrastructure::user::PostgresUserRepository;

/// Apply pending migrations, or revert the latest one
pub async fn run(config_path: Option<&Path>, revert: bool) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path)?;
    require_postgres(&config)?;

    let pool = crate::connect_postgres(&config.storage).await?;

    if revert {
        let migrator = PostgresMigrator::new(pool);
        let Some(version) = migrator.current_version().await? else {
            info!("No migrations applied, nothing to revert");
            return Ok(());
        };

        let Some(migration) = storage_migrations()
            .into_iter()
            .find(|m| m.version == version)
        else {
            bail!("Applied migration {} is unknown to this build", version);
        };

        migrator.revert_migration(&migration).await?;
        info!(version, description = migration.description, "Migration reverted");
    } else {
        let applied = run_storage_migrations(&pool).await?;
        info!(applied, "Migrations complete");
    }

    Ok(())
}

/// Hash every stored legacy plaintext password
pub async fn run_credentials(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path)?;
    require_postgres(&config)?;

    let pool = crate::connect_postgres(&config.storage).await?;
    let repository = std::sync::Arc::new(PostgresUserRepository::new(pool));
    let user_service = crate::create_user_service(repository, &config.auth);

    let migrated = user_service.migrate_legacy_credentials().await?;
    info!(migrated, "Credential migration complete");

    Ok(())
}

fn require_postgres(config: &AppConfig) -> anyhow::Result<()> {
    let backend: StorageType = config.storage.backend.parse()?;

    if backend != StorageType::Postgres {
        bail!(
            "storage.backend is '{}'; database commands need the postgres backend",
            config.storage.backend
        );
    }

    Ok(())
}
