//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 已持久化的产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建和更新共用的请求体
///
/// 缺失字段按零值处理，交给校验规则拒绝；`id` 和时间戳等多余字段会被忽略。
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: f64,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
