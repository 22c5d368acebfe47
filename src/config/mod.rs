use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub coingecko_api_url: String,
    pub coingecko_api_key: Option<String>,
    pub upstream_timeout_secs: u64,
    pub upstream_pace_delay_ms: u64,
    pub cache_ttl_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty()),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .map(|v| v.parse().unwrap_or(10))
                .unwrap_or(10),
            upstream_pace_delay_ms: env::var("UPSTREAM_PACE_DELAY_MS")
                .map(|v| v.parse().unwrap_or(500))
                .unwrap_or(500),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .map(|v| v.parse().unwrap_or(300))
                .unwrap_or(300),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .map(|v| v.parse().unwrap_or(60))
                .unwrap_or(60),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .map(|v| v.parse().unwrap_or(100))
                .unwrap_or(100),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .map(|v| v.parse().unwrap_or(3000))
                .unwrap_or(3000),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn pace_delay(&self) -> Duration {
        Duration::from_millis(self.upstream_pace_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}
