//! # 产品管理 API
//!
//! 单一产品实体的 REST CRUD 服务，分层如下：
//! - `app`：路由表、处理器、存储契约及其 PostgreSQL / 内存实现
//! - `core`：统一错误响应、请求提取器、中间件
//! - `infrastructure`：连接池和日志初始化
//! - `config`：环境变量配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{product::AppState, router};
pub use config::{Config, ConfigError};
