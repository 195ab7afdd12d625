//! Stock alert delivery.

mod telegram;

use anyhow::Result;
use async_trait::async_trait;

pub use telegram::TelegramClient;

/// Trait for alert delivery - enables mocking for tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` to every subscriber and returns how many received it.
    async fn broadcast(&self, message: &str) -> Result<usize>;
}
