mod store;

pub use store::PriceCache;
