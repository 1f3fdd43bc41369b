//! 产品存储抽象

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Product, ProductInput};

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 没有任何行匹配给定的 id
    #[error("product not found")]
    NotFound,

    #[error("storage deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 产品存储契约
///
/// 实现者只负责把操作翻译成存储语句，不做字段校验。
/// 每个操作都是单条语句；调用方丢弃 future 即视为取消。
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 插入新产品，返回带有生成的 id 和时间戳的完整记录
    async fn create(&self, input: &ProductInput) -> StoreResult<Product>;

    async fn get(&self, id: i64) -> StoreResult<Product>;

    /// 按 id 升序返回全部产品，表为空时返回空集合
    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// 覆盖 name/price 并刷新 updatedAt
    ///
    /// 没有匹配行时返回 [`StoreError::NotFound`]。
    async fn update(&self, id: i64, input: &ProductInput) -> StoreResult<bool>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// 在截止时间内运行存储操作
pub async fn with_deadline<T, F>(deadline: Duration, op: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(deadline, op).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::DeadlineExceeded(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_deadline_passes_through_result() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);

        let result: StoreResult<()> =
            with_deadline(Duration::from_secs(1), async { Err(StoreError::NotFound) }).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn with_deadline_reports_expiry_distinct_from_not_found() {
        let result: StoreResult<()> = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::DeadlineExceeded(d)) if d == Duration::from_millis(50)));
    }
}
