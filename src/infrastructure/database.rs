//! 数据库基础设施

use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

/// 启动时连通性检查的时限
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 创建连接池，此时不发起任何连接
    pub fn new(options: PgConnectOptions) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(PING_TIMEOUT)
            .connect_lazy_with(options);

        Self { pool }
    }

    /// 在时限内确认数据库可达
    pub async fn ping(&self) -> Result<(), Error> {
        let check = sqlx::query("SELECT 1").execute(&self.pool);

        match tokio::time::timeout(PING_TIMEOUT, check).await {
            Ok(result) => {
                result?;
                info!("Database connection established");
                Ok(())
            }
            Err(_) => Err(Error::PoolTimedOut),
        }
    }

    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}
