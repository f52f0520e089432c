//! Product repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Product, ProductDraft, ProductId};
use crate::domain::DomainError;

/// Storage for catalogue products
#[async_trait]
pub trait ProductRepository: Send + Sync + Debug {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Persist a new product, assigning its identifier
    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError>;

    /// Overwrite an existing product
    async fn update(&self, product: &Product) -> Result<Product, DomainError>;

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError>;

    /// List all products ordered by ID
    async fn list(&self) -> Result<Vec<Product>, DomainError>;

    async fn exists(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
