//! PostgreSQL product repository implementation

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::domain::product::{Product, ProductDraft, ProductId, ProductRepository};
use crate::domain::DomainError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, quantity, category, created_at, updated_at";

/// PostgreSQL implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, description, price, quantity, category,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(&draft.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create product: {}", e)))?;

        row_to_product(&row)
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, quantity = $5, category = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id().value())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.quantity())
        .bind(product.category())
        .bind(product.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Product {} not found",
                product.id()
            )));
        }

        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        rows.iter().map(row_to_product).collect()
    }
}

fn row_to_product(row: &sqlx::postgres::PgRow) -> Result<Product, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid product row: {}", e));

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let price: Decimal = row.try_get("price").map_err(map_err)?;
    let draft = ProductDraft {
        name: row.try_get("name").map_err(map_err)?,
        description: row.try_get("description").map_err(map_err)?,
        price,
        quantity: row.try_get("quantity").map_err(map_err)?,
        category: row.try_get("category").map_err(map_err)?,
    };

    Ok(Product::restore(
        ProductId::new(id),
        draft,
        row.try_get("created_at").map_err(map_err)?,
        row.try_get("updated_at").map_err(map_err)?,
    ))
}
