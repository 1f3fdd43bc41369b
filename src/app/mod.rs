//! 应用层：路由表和处理器

pub mod product;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    response::Json,
    routing::{any, get, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::RequestBodyTimeoutLayer, trace::TraceLayer};

use crate::core::middleware::{
    handle_timeout_error, method_not_allowed, request_logging_middleware,
};
use product::{handler, AppState};

/// 读取请求体的超时，请求头的读取时限在连接层设置
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

pub const GREETING: &str = "Product Manager API";

async fn greeting() -> Json<&'static str> {
    Json(GREETING)
}

/// `/products/` 前缀下取不出单个 id 的路径
fn malformed_id_routes() -> MethodRouter<AppState> {
    get(handler::invalid_id)
        .put(handler::invalid_id)
        .delete(handler::invalid_id)
        .head(method_not_allowed)
        .fallback(method_not_allowed)
}

/// 创建路由
///
/// `/` 同时作为未知路径的兜底；已知路径上未注册的方法（包括 HEAD）返回 405。
pub fn router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .route("/", any(greeting))
        .route(
            "/products",
            get(handler::list_products)
                .post(handler::create_product)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/products/", malformed_id_routes())
        .route("/products/:id/*rest", malformed_id_routes())
        .fallback(greeting)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout)
                .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT)),
        )
        // 放在超时层外侧，408 也会带上请求 id
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
