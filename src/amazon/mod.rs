//! Amazon availability through the Product Advertising API.

mod client;
mod models;
pub mod signer;

pub use client::{OfferLookup, PaapiClient};
pub use models::AmazonOffer;
