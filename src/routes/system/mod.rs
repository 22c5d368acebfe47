mod handler;
mod model;

pub use handler::{health, index};
