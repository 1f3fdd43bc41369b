//! 内存产品存储
//!
//! 不依赖数据库的 [`ProductStore`] 实现，用于测试和本地演示。

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{
    model::{Product, ProductInput},
    store::{ProductStore, StoreError, StoreResult},
};

#[derive(Default)]
struct Table {
    // id 只增不减，删除后不会被重复使用
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

#[derive(Clone, Default)]
pub struct MemoryProductStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // 持锁期间不会 panic，中毒时直接取回数据
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, input: &ProductInput) -> StoreResult<Product> {
        let mut table = self.lock();
        table.last_id += 1;

        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            name: input.name.clone(),
            price: input.price,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());

        Ok(product)
    }

    async fn get(&self, id: i64) -> StoreResult<Product> {
        self.lock().rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.lock().rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, input: &ProductInput) -> StoreResult<bool> {
        let mut table = self.lock();
        let product = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        product.name = input.name.clone();
        product.price = input.price;
        // 保证 updatedAt 严格晚于上一次的值
        let now = Utc::now();
        product.updated_at = if now > product.updated_at {
            now
        } else {
            product.updated_at + chrono::Duration::microseconds(1)
        };

        Ok(true)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
