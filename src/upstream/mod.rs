mod client;
mod model;

pub use client::{CoinGeckoClient, FetchError, PriceProvider};
pub use model::PriceRecord;
