//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, StoredCredential, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<UserId, User>,
    /// Index for username -> user ID lookup
    username_index: HashMap<String, UserId>,
    last_id: i64,
}

/// In-memory implementation of UserRepository.
///
/// The username check and the insert happen under the same write lock.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with existing users, keeping their IDs
    pub fn with_users(users: Vec<User>) -> Self {
        let mut table = UserTable::default();

        for user in users {
            table.last_id = table.last_id.max(user.id().value());
            table
                .username_index
                .insert(user.username().to_string(), user.id());
            table.users.insert(user.id(), user);
        }

        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.username_index.contains_key(&user.username) {
            return Err(DomainError::duplicate_username(user.username));
        }

        table.last_id += 1;
        let user = User::new(UserId::new(table.last_id), user);

        table
            .username_index
            .insert(user.username().to_string(), user.id());
        table.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let id = user.id();

        let old_username = match table.users.get(&id) {
            Some(existing) => existing.username().to_string(),
            None => return Err(DomainError::not_found(format!("User {} not found", id))),
        };
        let new_username = user.username().to_string();

        // If username changed, check uniqueness and update index
        if old_username != new_username {
            if table.username_index.contains_key(&new_username) {
                return Err(DomainError::duplicate_username(new_username));
            }

            table.username_index.remove(&old_username);
            table.username_index.insert(new_username, id);
        }

        table.users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn update_credential(
        &self,
        id: UserId,
        credential: &StoredCredential,
    ) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let user = table
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", id)))?;
        user.set_credential(credential.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        if let Some(user) = table.users.remove(&id) {
            table.username_index.remove(user.username());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.len())
    }
}
