use chrono::{DateTime, Utc};
use std::sync::Arc;

use cache::PriceCache;
use config::Config;
use upstream::PriceProvider;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod upstream;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: Arc<PriceCache>,
    pub upstream: Arc<dyn PriceProvider>,
    pub started_at: DateTime<Utc>,
}
