//! Product service for catalogue management

use std::sync::Arc;

use tracing::info;

use crate::domain::product::{Product, ProductId, ProductInput, ProductRepository};
use crate::domain::DomainError;

/// Product service orchestrating validation and storage
#[derive(Debug)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and persist a new product
    pub async fn create(&self, input: ProductInput) -> Result<Product, DomainError> {
        let draft = input.validate()?;
        let product = self.repository.create(draft).await?;

        info!(product_id = %product.id(), name = %product.name(), "Created product");
        Ok(product)
    }

    /// List all products ordered by ID
    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.list().await
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product {} not found", id)))
    }

    /// Replace every mutable field of an existing product
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, DomainError> {
        let mut product = self.get(id).await?;
        let draft = input.validate()?;

        product.apply(draft);
        let product = self.repository.update(&product).await?;

        info!(product_id = %product.id(), "Updated product");
        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(format!("Product {} not found", id)));
        }

        info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::product::InMemoryProductRepository;
    use rust_decimal::Decimal;

    fn create_service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(Arc::new(InMemoryProductRepository::new()))
    }

    fn input(name: &str, price: Decimal, quantity: Option<i32>) -> ProductInput {
        ProductInput {
            name: Some(name.to_string()),
            description: Some("A test product".to_string()),
            price: Some(price),
            quantity,
            category: Some("Electronics".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_product() {
        let service = create_service();

        let product = service
            .create(input("Laptop", Decimal::new(1500, 0), Some(10)))
            .await
            .unwrap();

        assert_eq!(product.id().value(), 1);
        assert_eq!(product.name(), "Laptop");
        assert_eq!(product.quantity(), 10);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let service = create_service();

        for price in [Decimal::ZERO, Decimal::new(-1, 0)] {
            let result = service.create(input("Laptop", price, Some(1))).await;
            assert!(matches!(result, Err(DomainError::Validation { .. })));
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_accepts_zero_quantity() {
        let service = create_service();

        let product = service
            .create(input("Cable", Decimal::new(5, 1), Some(0)))
            .await
            .unwrap();
        assert_eq!(product.quantity(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let service = create_service();

        let result = service.get(ProductId::new(404)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let service = create_service();
        let product = service
            .create(input("Laptop", Decimal::new(1500, 0), Some(10)))
            .await
            .unwrap();

        let updated = service
            .update(
                product.id(),
                ProductInput {
                    name: Some("Laptop Pro".to_string()),
                    price: Some(Decimal::new(2000, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "Laptop Pro");
        assert_eq!(updated.price(), Decimal::new(2000, 0));
        assert_eq!(updated.quantity(), 0);
        assert!(updated.description().is_none());
        assert!(updated.category().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let service = create_service();

        let result = service
            .update(ProductId::new(1), input("Laptop", Decimal::ONE, None))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_invalid_input_keeps_product() {
        let service = create_service();
        let product = service
            .create(input("Laptop", Decimal::new(1500, 0), Some(10)))
            .await
            .unwrap();

        let result = service
            .update(product.id(), input("Laptop", Decimal::ZERO, Some(10)))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let stored = service.get(product.id()).await.unwrap();
        assert_eq!(stored.price(), Decimal::new(1500, 0));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let product = service
            .create(input("Laptop", Decimal::new(1500, 0), None))
            .await
            .unwrap();

        service.delete(product.id()).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let service = create_service();

        let result = service.delete(ProductId::new(999)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    /// Reports the product as present but finds nothing left to delete,
    /// as when a concurrent request removed it first.
    #[derive(Debug)]
    struct ConcurrentlyDeletedRepository;

    #[async_trait::async_trait]
    impl ProductRepository for ConcurrentlyDeletedRepository {
        async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
            let draft = input("Laptop", Decimal::ONE, None).validate().unwrap();
            Ok(Some(Product::new(id, draft)))
        }

        async fn create(&self, _draft: crate::domain::ProductDraft) -> Result<Product, DomainError> {
            Err(DomainError::internal("not used"))
        }

        async fn update(&self, product: &Product) -> Result<Product, DomainError> {
            Ok(product.clone())
        }

        async fn delete(&self, _id: ProductId) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list(&self) -> Result<Vec<Product>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_delete_lost_race_is_not_found() {
        let service = ProductService::new(Arc::new(ConcurrentlyDeletedRepository));

        assert!(service.repository.exists(ProductId::new(7)).await.unwrap());

        let result = service.delete(ProductId::new(7)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
