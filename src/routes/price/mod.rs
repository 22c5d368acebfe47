mod handler;
mod model;

pub use handler::{get_price, get_prices};
