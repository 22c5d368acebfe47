use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use chrono::Utc;
use price_backend::{
    AppState, cache::PriceCache, config::Config, middleware::RateLimiter, router::create_router,
    upstream::CoinGeckoClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    // 设置上游客户端
    let upstream = CoinGeckoClient::new(&config).expect("Failed to create upstream client");

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        cache: Arc::new(PriceCache::new(config.cache_ttl())),
        upstream: Arc::new(upstream),
        started_at: Utc::now(),
    };

    // 设置限流器
    let rate_limiter = Arc::new(RateLimiter::new(&config));

    let app = create_router(state, rate_limiter);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
