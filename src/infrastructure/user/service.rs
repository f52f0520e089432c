//! User service for authentication and user management

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::user::{
    validate_email, validate_full_name, validate_password, validate_registration,
    validate_username, NewUser, StoredCredential, User, UserId, UserRepository,
};
use crate::domain::{DomainError, Violations};
use crate::infrastructure::observability::{record_login_attempt, record_registration, LoginOutcome};

use super::password::{CredentialVerifier, PasswordHasher};

/// Request for registering a new user
#[derive(Debug, Clone, Default)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Partial profile update; absent or blank fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Trim optional text, treating blank values as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    verifier: CredentialVerifier<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service that rejects legacy plaintext credentials
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        let verifier = CredentialVerifier::new(Arc::clone(&hasher), false);
        Self {
            repository,
            hasher,
            verifier,
        }
    }

    /// Accept (and upgrade on login) credentials stored as plaintext
    pub fn with_legacy_plaintext(mut self, allow: bool) -> Self {
        self.verifier = CredentialVerifier::new(Arc::clone(&self.hasher), allow);
        self
    }

    /// Register a new user with a freshly hashed password
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let username = request.username.trim().to_string();
        let full_name = non_blank(request.full_name);
        let email = non_blank(request.email);

        validate_registration(
            &username,
            &request.password,
            full_name.as_deref(),
            email.as_deref(),
        )?;

        if self.repository.username_exists(&username).await? {
            return Err(DomainError::duplicate_username(username));
        }

        let hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                username,
                credential: StoredCredential::hashed(hash),
                full_name,
                email,
            })
            .await?;

        record_registration();
        info!(user_id = %user.id(), username = %user.username(), "Registered user");

        Ok(user)
    }

    /// Authenticate a user with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();

        let mut violations = Violations::new();
        if username.is_empty() {
            violations.push("username", "Username is required");
        }
        if password.trim().is_empty() {
            violations.push("password", "Password is required");
        }
        violations.into_result()?;

        let Some(user) = self.repository.get_by_username(username).await? else {
            record_login_attempt(LoginOutcome::UnknownUser);
            warn!(username = %username, "Login attempt for unknown user");
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                username
            )));
        };

        if !self.verifier.verify(password, user.credential()) {
            record_login_attempt(LoginOutcome::InvalidPassword);
            warn!(user_id = %user.id(), "Login attempt with invalid password");
            return Err(DomainError::InvalidCredentials);
        }

        record_login_attempt(LoginOutcome::Success);
        debug!(user_id = %user.id(), "User authenticated");

        if user.credential().is_legacy() {
            return Ok(self.upgrade_credential(user, password).await);
        }

        Ok(user)
    }

    /// Re-store a legacy plaintext credential as a hash.
    ///
    /// A failed upgrade does not fail the login; the record is retried on
    /// the next login or by the migration pass.
    async fn upgrade_credential(&self, user: User, password: &str) -> User {
        let upgraded = match self.hasher.hash(password) {
            Ok(hash) => {
                self.repository
                    .update_credential(user.id(), &StoredCredential::hashed(hash))
                    .await
            }
            Err(e) => Err(e),
        };

        match upgraded {
            Ok(user) => {
                info!(user_id = %user.id(), "Upgraded legacy plaintext credential");
                user
            }
            Err(e) => {
                error!(user_id = %user.id(), error = %e, "Failed to upgrade legacy credential");
                user
            }
        }
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", id)))
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Apply a partial profile update
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError> {
        let mut user = self.get(id).await?;

        let username = non_blank(request.username);
        let password = request.password.filter(|p| !p.trim().is_empty());
        let full_name = non_blank(request.full_name);
        let email = non_blank(request.email);

        let mut violations = Violations::new();
        if let Some(username) = &username {
            violations.check("username", validate_username(username));
        }
        if let Some(password) = &password {
            violations.check("password", validate_password(password));
        }
        if let Some(full_name) = &full_name {
            violations.check("full_name", validate_full_name(full_name));
        }
        if let Some(email) = &email {
            violations.check("email", validate_email(email));
        }
        violations.into_result()?;

        if let Some(username) = username {
            if username != user.username() {
                if self.repository.username_exists(&username).await? {
                    return Err(DomainError::duplicate_username(username));
                }
                user.set_username(username);
            }
        }

        if let Some(password) = password {
            let hash = self.hasher.hash(&password)?;
            user.set_credential(StoredCredential::hashed(hash));
        }

        if let Some(full_name) = full_name {
            user.set_full_name(full_name);
        }

        if let Some(email) = email {
            user.set_email(email);
        }

        let user = self.repository.update(&user).await?;
        info!(user_id = %user.id(), "Updated user");

        Ok(user)
    }

    /// Delete a user
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(format!("User {} not found", id)));
        }

        info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Hash every credential still stored as plaintext.
    ///
    /// Returns the number of migrated users.
    pub async fn migrate_legacy_credentials(&self) -> Result<usize, DomainError> {
        let mut migrated = 0;

        for user in self.repository.list().await? {
            if !user.credential().is_legacy() {
                continue;
            }

            let hash = self.hasher.hash(user.credential().value())?;
            match self
                .repository
                .update_credential(user.id(), &StoredCredential::hashed(hash))
                .await
            {
                Ok(_) => {}
                Err(DomainError::NotFound { .. }) => {
                    debug!(user_id = %user.id(), "User deleted during migration, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            }

            debug!(user_id = %user.id(), "Migrated legacy credential");
            migrated += 1;
        }

        info!(migrated, "Legacy credential migration complete");
        Ok(migrated)
    }

    /// Register the user unless the username is already taken.
    ///
    /// Returns the new user, or `None` when it already existed.
    pub async fn ensure_user(&self, request: RegisterUserRequest) -> Result<Option<User>, DomainError> {
        if self.repository.username_exists(request.username.trim()).await? {
            debug!(username = %request.username, "User already exists, skipping");
            return Ok(None);
        }

        self.register(request).await.map(Some)
    }
}
