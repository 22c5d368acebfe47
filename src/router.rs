use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    middleware::{RateLimiter, log_errors, rate_limit},
    routes,
};

// 价格相关的路由
fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/price/{id}", get(routes::price::get_price))
        .route("/prices/{ids}", get(routes::price::get_prices))
}

// 服务自身的路由
fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
}

// 创建主路由
pub fn create_router(state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .merge(price_routes())
        .merge(system_routes())
        // 添加日志中间件和限流中间件
        .layer(axum::middleware::from_fn(log_errors))
        .layer(axum::middleware::from_fn_with_state(rate_limiter, rate_limit))
        // CORS 放在最外层，限流拒绝的响应同样带上许可头
        .layer(CorsLayer::permissive())
        .with_state(state)
}
