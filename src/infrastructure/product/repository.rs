//! In-memory product repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::product::{Product, ProductDraft, ProductId, ProductRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct ProductTable {
    products: BTreeMap<ProductId, Product>,
    last_id: i64,
}

/// In-memory implementation of ProductRepository
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: Arc<RwLock<ProductTable>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let table = self.table.read().await;
        Ok(table.products.get(&id).cloned())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let mut table = self.table.write().await;

        table.last_id += 1;
        let product = Product::new(ProductId::new(table.last_id), draft);
        table.products.insert(product.id(), product.clone());

        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut table = self.table.write().await;

        match table.products.get_mut(&product.id()) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Product {} not found",
                product.id()
            ))),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;
        Ok(table.products.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let table = self.table.read().await;
        Ok(table.products.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: None,
            price: Decimal::new(999, 2),
            quantity: 1,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(draft("Keyboard")).await.unwrap();
        assert_eq!(product.id().value(), 1);

        let retrieved = repo.get(product.id()).await.unwrap().unwrap();
        assert_eq!(retrieved, product);
        assert!(repo.exists(product.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = InMemoryProductRepository::new();
        let ghost = Product::new(ProductId::new(9), draft("Ghost"));

        let result = repo.update(&ghost).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_and_list_order() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(draft("First")).await.unwrap();
        repo.create(draft("Second")).await.unwrap();
        repo.create(draft("Third")).await.unwrap();

        assert!(repo.delete(first.id()).await.unwrap());
        assert!(!repo.delete(first.id()).await.unwrap());

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Second", "Third"]);
    }
}
