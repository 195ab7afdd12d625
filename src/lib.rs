//! stock-tracker - Track Indian e-commerce products by URL
//!
//! Resolves product URLs from Amazon, Flipkart, Croma, Apple, Vivo, iQOO and
//! Reliance Digital into normalized records, keeps a local list of tracked
//! products, checks Croma and Amazon availability and sends Telegram alerts.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod croma;
pub mod error;
pub mod format;
pub mod notify;
pub mod reliance;
pub mod resolver;
pub mod stores;
pub mod throttle;
pub mod tracker;

pub use config::Config;
pub use error::{ResolveError, StoreError};
pub use resolver::Resolver;
pub use stores::{ProductDescriptor, StoreType, TrackedProduct};
