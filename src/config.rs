//! 环境变量配置

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// 未设置 `DB_ADDR` 时的监听地址
pub const DEFAULT_LISTEN_ADDR: &str = ":3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("DB_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("DB_ADDR must look like host:port or :port, got {0:?}")]
    InvalidListenAddr(String),
}

/// 数据库连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    /// 交给 `TcpListener::bind` 解析，可以是主机名
    pub listen_addr: String,
}

impl Config {
    /// 先加载 `.env`（不存在也没关系），再读取进程环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port = required("DB_PORT")?;
        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: port.trim().parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
        };

        let addr = lookup("DB_ADDR")
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        Ok(Self {
            database,
            listen_addr: parse_listen_addr(&addr)?,
        })
    }
}

/// 规范化监听地址，`:port` 表示监听所有网卡
pub fn parse_listen_addr(addr: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidListenAddr(addr.to_string());

    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;

    if host.is_empty() {
        Ok(format!("0.0.0.0:{port}"))
    } else {
        Ok(addr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const DB_VARS: [(&str, &str); 5] = [
        ("DB_HOST", "localhost"),
        ("DB_PORT", "5432"),
        ("DB_USER", "postgres"),
        ("DB_PASSWORD", "secret"),
        ("DB_NAME", "products"),
    ];

    #[test]
    fn listen_addr_defaults_to_all_interfaces() {
        let config = Config::from_lookup(env(&DB_VARS)).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "products");
    }

    #[test]
    fn explicit_listen_addr_is_used() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("DB_ADDR", "127.0.0.1:8080"));

        let config = Config::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let vars: Vec<_> = DB_VARS.iter().copied().filter(|(k, _)| *k != "DB_USER").collect();

        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_USER")));
    }

    #[test]
    fn invalid_port_and_addr_are_rejected() {
        let mut vars = DB_VARS.to_vec();
        vars[1] = ("DB_PORT", "postgres");
        assert!(matches!(
            Config::from_lookup(env(&vars)),
            Err(ConfigError::InvalidPort(_))
        ));

        assert!(matches!(
            parse_listen_addr("localhost"),
            Err(ConfigError::InvalidListenAddr(_))
        ));
        assert!(matches!(
            parse_listen_addr("localhost:http"),
            Err(ConfigError::InvalidListenAddr(_))
        ));
        assert_eq!(parse_listen_addr(":8081").unwrap(), "0.0.0.0:8081");
        assert_eq!(parse_listen_addr("localhost:8081").unwrap(), "localhost:8081");
    }
}
