use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;

use crate::{
    config::Config,
    error::AppError,
    utils::{Clock, SystemClock},
};

/// 按客户端 IP 做滑动窗口限流，窗口内的请求时间戳全部留存在内存里
pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests: config.rate_limit_requests as usize,
            window: config.rate_limit_window(),
            clock,
        }
    }

    /// 判定并记录一次请求：先剔除滑出窗口的时间戳，未满则放行并记录；
    /// 已满则拒绝，被拒绝的请求不留任何痕迹
    pub fn admit(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock();
        let window = windows.entry(key.to_string()).or_default();

        // 恰好满一个窗口期的时间戳同样滑出
        while let Some(front) = window.front() {
            if now.duration_since(*front) >= self.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() < self.max_requests {
            window.push_back(now);
            true
        } else {
            false
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        let ip = client_ip(&req);

        if !self.admit(&ip) {
            tracing::warn!("rate limit exceeded for {}", ip);
            return AppError::RateLimited.into_response();
        }

        next.run(req).await
    }
}

// 从请求头中获取IP，或者使用连接信息中的IP作为默认值
fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or_else(|| remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
