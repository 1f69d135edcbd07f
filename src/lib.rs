pub mod converter;
pub mod metrics;
pub mod models;
pub mod utils;
