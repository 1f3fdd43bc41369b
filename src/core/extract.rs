//! 请求提取器
//!
//! axum 自带的 `Json`/`Path` 拒绝时返回纯文本，这里换成统一的 JSON 错误。

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::CoreError;

/// 不检查 Content-Type 的 JSON 请求体
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            warn!("Failed to read request body: {}", err);
            CoreError::BadRequest("invalid request body".to_string())
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|err| {
            warn!("Failed to decode JSON: {}", err);
            CoreError::BadRequest("invalid JSON".to_string())
        })
    }
}

/// 路径末段的产品 id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductId(pub i64);

impl ProductId {
    pub fn parse(segment: &str) -> Result<Self, CoreError> {
        segment
            .parse::<i64>()
            .map(ProductId)
            .map_err(|_| CoreError::BadRequest("invalid ID".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| CoreError::BadRequest("invalid ID".to_string()))?;

        ProductId::parse(&segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers() {
        assert_eq!(ProductId::parse("42").unwrap(), ProductId(42));
        assert_eq!(ProductId::parse("-3").unwrap(), ProductId(-3));
    }

    #[test]
    fn rejects_non_integers() {
        for segment in ["abc", "", "1.5", "12abc", "99999999999999999999"] {
            assert!(
                matches!(ProductId::parse(segment), Err(CoreError::BadRequest(_))),
                "segment {segment:?} should be rejected"
            );
        }
    }
}
