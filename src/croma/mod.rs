//! Croma availability checks for tracked products.

mod client;

pub use client::{CromaClient, StockChecker};
