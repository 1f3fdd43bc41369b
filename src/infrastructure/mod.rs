//! 基础设施层：数据库、日志和 HTTP 连接

pub mod database;
pub mod logger;
pub mod server;
