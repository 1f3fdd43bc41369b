//! PostgreSQL 产品存储

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::debug;

use super::{
    model::{Product, ProductInput},
    store::{ProductStore, StoreError, StoreResult},
};

// 列名未加引号，PostgreSQL 会折叠成小写，这里统一起别名以匹配 Product 字段
const PRODUCT_COLUMNS: &str =
    "id, name, price, createdAt AS created_at, updatedAt AS updated_at";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, input: &ProductInput) -> StoreResult<Product> {
        let sql = format!(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&input.name)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;

        debug!("Inserted product {}", product.id);
        Ok(product)
    }

    async fn get(&self, id: i64) -> StoreResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn update(&self, id: i64, input: &ProductInput) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE products SET name = $1, price = $2, updatedAt = NOW() WHERE id = $3")
                .bind(&input.name)
                .bind(input.price)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(true)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!("Deleted product {}", id);
        Ok(())
    }
}
