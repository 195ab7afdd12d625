//! Store classification, per-store parsing rules and product models.

pub mod affiliate;
pub mod classifier;
pub mod kind;
pub mod models;
pub mod naming;
pub mod strategies;

pub use affiliate::affiliate_link;
pub use classifier::classify_host;
pub use kind::StoreType;
pub use models::{ProductDescriptor, TrackedProduct};
pub use strategies::UrlParts;
