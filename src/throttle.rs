//! Request pacing.

use rand::RngExt;
use std::time::Duration;
use tracing::debug;

/// Sleeps for `base_ms` plus a random jitter of up to `jitter_ms`.
pub async fn pause(base_ms: u64, jitter_ms: u64) {
    if base_ms == 0 && jitter_ms == 0 {
        return;
    }

    let jitter = if jitter_ms > 0 { rand::rng().random_range(0..=jitter_ms) } else { 0 };

    let total_delay = base_ms + jitter;
    debug!("Delaying {}ms", total_delay);
    tokio::time::sleep(Duration::from_millis(total_delay)).await;
}
