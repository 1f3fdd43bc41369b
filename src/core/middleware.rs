//! 核心中间件模块

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower::BoxError;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::error::CoreError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求日志中间件，同时把请求 id 写回响应头
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        %request_id,
        "{} {} - {} - {}ms",
        method,
        uri,
        status,
        duration.as_millis()
    );

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// 把 tower 超时层的错误转换成 JSON 响应
pub async fn handle_timeout_error(err: BoxError) -> CoreError {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request exceeded the write timeout");
        CoreError::RequestTimeout
    } else {
        error!("Unhandled middleware error: {}", err);
        CoreError::InternalServerError("internal server error".to_string())
    }
}

/// 已知路径上不支持的方法
pub async fn method_not_allowed() -> CoreError {
    CoreError::MethodNotAllowed
}
