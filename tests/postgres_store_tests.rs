//! 需要真实 PostgreSQL：设置 TEST_DATABASE_URL 后运行，否则跳过

use product_manager::app::product::{PgProductStore, ProductInput, ProductStore, StoreError};
use sqlx::postgres::{PgPool, PgPoolOptions};

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL tests");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::query(SCHEMA)
        .execute(&pool)
        .await
        .expect("Failed to create tables");

    Some(pool)
}

// 所有断言放在一个测试里，避免并发测试互相清表
#[tokio::test]
async fn pg_store_crud_cycle() {
    let Some(pool) = test_pool().await else {
        return;
    };
    sqlx::query("TRUNCATE products RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate products");

    let store = PgProductStore::new(pool);

    assert!(store.list().await.unwrap().is_empty());

    let first = store.create(&ProductInput::new("Keyboard", 49.9)).await.unwrap();
    let second = store.create(&ProductInput::new("Mouse", 19.5)).await.unwrap();
    assert!(second.id > first.id);
    assert_eq!(first.created_at, first.updated_at);

    let fetched = store.get(first.id).await.unwrap();
    assert_eq!(fetched.name, "Keyboard");
    assert_eq!(fetched.price, 49.9);

    let ids: Vec<i64> = store.list().await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    assert!(store
        .update(first.id, &ProductInput::new("Mechanical keyboard", 89.0))
        .await
        .unwrap());
    let updated = store.get(first.id).await.unwrap();
    assert_eq!(updated.name, "Mechanical keyboard");
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at > first.updated_at);

    store.delete(second.id).await.unwrap();
    assert!(matches!(store.get(second.id).await, Err(StoreError::NotFound)));
    assert!(matches!(store.delete(second.id).await, Err(StoreError::NotFound)));
    assert!(matches!(
        store.update(999_999, &ProductInput::new("Ghost", 1.0)).await,
        Err(StoreError::NotFound)
    ));

    let third = store.create(&ProductInput::new("Monitor", 199.0)).await.unwrap();
    assert!(third.id > second.id);
}
