use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::upstream::FetchError;

/// 对外暴露的错误分类，响应体里只有稳定的 error 标签和提示语，
/// 上游的原始错误细节只进日志
#[derive(Debug)]
pub enum AppError {
    /// 上游查不到这个币种 ID
    NotFound,
    /// 本服务自己的限流拒绝
    RateLimited,
    /// 上游供应商返回了限流状态
    UpstreamRateLimited,
    /// 上游调用超时
    Timeout,
    /// 其他上游失败（传输、解析、非 2xx 状态）
    Upstream(String),
    /// 编排层级的失败，比如批量查询的共享价格调用整体失败
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Cryptocurrency not found",
                "The specified cryptocurrency ID does not exist".to_string(),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded",
                "Too many requests, please try again later".to_string(),
            ),
            AppError::UpstreamRateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded",
                "The upstream data provider is rate limiting requests, please try again shortly"
                    .to_string(),
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request timeout",
                "The upstream data provider took too long to respond".to_string(),
            ),
            AppError::Upstream(detail) => {
                tracing::error!("upstream failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An unexpected error occurred".to_string(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("internal failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

// 上游错误在编排边界统一收敛成对外分类
impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => AppError::NotFound,
            FetchError::RateLimited => AppError::UpstreamRateLimited,
            FetchError::Timeout => AppError::Timeout,
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body_is_stable() {
        let (status, body) = body_json(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Cryptocurrency not found");
        assert_eq!(
            body["message"],
            "The specified cryptocurrency ID does not exist"
        );
    }

    #[tokio::test]
    async fn both_rate_limit_kinds_share_the_429_family() {
        let (status, body) = body_json(AppError::RateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Rate limit exceeded");

        let (status, body) = body_json(AppError::UpstreamRateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Rate limit exceeded");
    }

    #[tokio::test]
    async fn timeout_maps_to_408() {
        let (status, body) = body_json(AppError::Timeout).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error"], "Request timeout");
    }

    #[tokio::test]
    async fn upstream_detail_never_reaches_the_body() {
        let (status, body) =
            body_json(AppError::Upstream("secret inner detail".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("secret inner detail"));
    }

    #[tokio::test]
    async fn fetch_errors_map_to_taxonomy() {
        let (status, _) = body_json(FetchError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = body_json(FetchError::RateLimited.into()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, _) = body_json(FetchError::Timeout.into()).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

        let (status, _) = body_json(FetchError::Status(502).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
