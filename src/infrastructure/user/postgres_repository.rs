//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{
    CredentialFormat, NewUser, StoredCredential, User, UserId, UserRepository,
};
use crate::domain::DomainError;

const USER_COLUMNS: &str =
    "id, username, password, password_format, full_name, email, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, password, password_format, full_name, email,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(user.credential.value())
        .bind(user.credential.format().as_str())
        .bind(&user.full_name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.username, "create"))?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password = $3, password_format = $4, full_name = $5,
                email = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.username())
        .bind(user.credential().value())
        .bind(user.credential().format().as_str())
        .bind(user.full_name())
        .bind(user.email())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.username(), "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User {} not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn update_credential(
        &self,
        id: UserId,
        credential: &StoredCredential,
    ) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET password = $2, password_format = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.value())
        .bind(credential.value())
        .bind(credential.format().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update credential: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(format!("User {} not found", id))),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Map a write failure, turning the `users.username` unique constraint into
/// a duplicate-username error.
fn map_write_error(error: sqlx::Error, username: &str, action: &str) -> DomainError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        DomainError::duplicate_username(username)
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, error))
    }
}

/// Rows written before the format column existed carry NULL and are classified on load
fn parse_format(raw: Option<&str>) -> Option<CredentialFormat> {
    raw.and_then(CredentialFormat::parse)
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let username: String = row.try_get("username").map_err(map_err)?;
    let password: String = row.try_get("password").map_err(map_err)?;
    let format: Option<String> = row.try_get("password_format").map_err(map_err)?;
    let full_name: Option<String> = row.try_get("full_name").map_err(map_err)?;
    let email: Option<String> = row.try_get("email").map_err(map_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(map_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(map_err)?;

    let credential = StoredCredential::from_storage(password, parse_format(format.as_deref()));

    Ok(User::restore(
        UserId::new(id),
        username,
        credential,
        full_name,
        email,
        created_at,
        updated_at,
    ))
}
