//! Application state for shared services

use std::sync::Arc;

use crate::domain::product::{Product, ProductId, ProductInput, ProductRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::product::ProductService;
use crate::infrastructure::user::{
    PasswordHasher, RegisterUserRequest, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub product_service: Arc<dyn ProductServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn login(&self, username: &str, password: &str) -> Result<User, DomainError>;
    async fn get(&self, id: UserId) -> Result<User, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;
    /// Round-trip to the store, used by the readiness probe
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for product service operations
#[async_trait::async_trait]
pub trait ProductServiceTrait: Send + Sync {
    async fn create(&self, input: ProductInput) -> Result<Product, DomainError>;
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn get(&self, id: ProductId) -> Result<Product, DomainError>;
    async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, DomainError>;
    async fn delete(&self, id: ProductId) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        UserService::login(self, username, password).await
    }

    async fn get(&self, id: UserId) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: ProductRepository + 'static> ProductServiceTrait for ProductService<R> {
    async fn create(&self, input: ProductInput) -> Result<Product, DomainError> {
        ProductService::create(self, input).await
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        ProductService::list(self).await
    }

    async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        ProductService::get(self, id).await
    }

    async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, DomainError> {
        ProductService::update(self, id, input).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        ProductService::delete(self, id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        product_service: Arc<dyn ProductServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            product_service,
            jwt_service,
        }
    }
}
