//! 产品处理器

use std::{sync::Arc, time::Duration};

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;
use validator::Validate;

use super::{
    model::{Product, ProductInput},
    store::{with_deadline, ProductStore},
};
use crate::core::{
    error::CoreError,
    extract::{JsonBody, ProductId},
};

/// 默认的单次存储操作截止时间，与写超时一致
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);
/// 处理并写出响应的超时
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub query_timeout: Duration,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// `/products/` 下无法取出单个 id 的路径，如 `/products/` 和 `/products/1/x`
pub async fn invalid_id() -> CoreError {
    CoreError::BadRequest("invalid ID".to_string())
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductInput>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    payload.validate()?;

    let product = with_deadline(state.query_timeout, state.store.create(&payload))
        .await
        .map_err(|e| CoreError::from_store(e, "failed to create product"))?;

    info!("Created product: {} ({})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, CoreError> {
    let products = with_deadline(state.query_timeout, state.store.list())
        .await
        .map_err(|e| CoreError::from_store(e, "failed to list products"))?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, CoreError> {
    let product = with_deadline(state.query_timeout, state.store.get(id))
        .await
        .map_err(|e| CoreError::from_store(e, "failed to fetch product"))?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    JsonBody(payload): JsonBody<ProductInput>,
) -> Result<Json<bool>, CoreError> {
    payload.validate()?;

    let updated = with_deadline(state.query_timeout, state.store.update(id, &payload))
        .await
        .map_err(|e| CoreError::from_store(e, "failed to update product"))?;

    if !updated {
        return Err(CoreError::InternalServerError(
            "could not update product".to_string(),
        ));
    }

    info!("Updated product: {}", id);

    Ok(Json(true))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<bool>, CoreError> {
    with_deadline(state.query_timeout, state.store.delete(id))
        .await
        .map_err(|e| CoreError::from_store(e, "failed to delete product"))?;

    info!("Deleted product: {}", id);

    Ok(Json(true))
}
