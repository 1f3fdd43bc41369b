//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::app::product::store::StoreError;

/// 核心错误类型
///
/// 每个变体对应一个 HTTP 状态码，响应体统一为 `{"error": <message>}`。
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    RequestTimeout,
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            CoreError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 把存储错误映射为对外错误，内部细节只写日志
    pub fn from_store(err: StoreError, public_message: &str) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound("product not found".to_string()),
            other => {
                error!("{}: {}", public_message, other);
                CoreError::InternalServerError(public_message.to_string())
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::BadRequest(msg)
            | CoreError::NotFound(msg)
            | CoreError::InternalServerError(msg) => msg,
            CoreError::MethodNotAllowed => "method not allowed".to_string(),
            CoreError::RequestTimeout => "request timed out".to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "validation error".to_string())
                })
            })
            .collect();
        // field_errors 底层是 HashMap，排序后消息才稳定
        messages.sort();

        CoreError::BadRequest(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: CoreError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_single_error_key() {
        let (status, body) = body_json(CoreError::BadRequest("invalid ID".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "invalid ID" }));

        let (status, body) = body_json(CoreError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "method not allowed");
    }

    #[tokio::test]
    async fn store_errors_do_not_leak_detail() {
        let err = CoreError::from_store(
            StoreError::Database(sqlx::Error::PoolTimedOut),
            "failed to fetch product",
        );
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "failed to fetch product");

        let err = CoreError::from_store(StoreError::NotFound, "failed to fetch product");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
