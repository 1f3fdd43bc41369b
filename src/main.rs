use std::{env, sync::Arc};

use product_manager::{
    app::product::{AppState, MemoryProductStore, PgProductStore, ProductStore},
    infrastructure::{
        database::DatabaseManager,
        logger::Logger,
        server::{self, ServerTimeouts},
    },
    router, Config,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init("info");

    info!("Starting product manager API");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // --memory: 不连接数据库，用内存存储跑一个本地实例
    let use_memory = env::args().skip(1).any(|arg| arg == "--memory");

    let store: Arc<dyn ProductStore> = if use_memory {
        warn!("Running with the in-memory store; data is lost on exit");
        Arc::new(MemoryProductStore::new())
    } else {
        info!(
            "Connecting to database {} at {}:{}",
            config.database.name, config.database.host, config.database.port
        );

        let database = DatabaseManager::new(config.database.connect_options());
        database.ping().await.map_err(|e| {
            error!("Could not verify the database connection: {}", e);
            e
        })?;

        Arc::new(PgProductStore::new(database.into_pool()))
    };

    let app = router(AppState::new(store));

    let listener = TcpListener::bind(&config.listen_addr).await.map_err(|e| {
        error!("Could not bind {}: {}", config.listen_addr, e);
        e
    })?;

    info!("🚀 Server listening on http://{}", listener.local_addr()?);
    info!("   POST   /products      - Create product");
    info!("   GET    /products      - List products");
    info!("   GET    /products/:id  - Get product");
    info!("   PUT    /products/:id  - Update product");
    info!("   DELETE /products/:id  - Delete product");

    server::serve(listener, app, ServerTimeouts::default(), shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            e
        })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // 无法监听信号时保持运行
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
