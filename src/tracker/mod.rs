//! Tracked product persistence and stock check results.

pub mod status;
pub mod store;

pub use status::StockStatus;
pub use store::{JsonFileStore, ProductStore};
