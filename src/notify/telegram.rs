//! Telegram Bot API broadcaster.

use crate::config::Config;
use crate::notify::Notifier;
use crate::throttle;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use wreq::Client;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Sends messages to every chat that has talked to the bot.
pub struct TelegramClient {
    client: Client,
    token: String,
    base_url: String,
    send_interval_ms: u64,
}

impl TelegramClient {
    /// Creates a new client; requires `telegram_bot_token` to be configured.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, TELEGRAM_API_BASE.to_string())
    }

    /// Creates a new client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let token = config.telegram_bot_token.clone().context(
            "Telegram bot token not configured (set telegram_bot_token or TRACKER_TELEGRAM_TOKEN)",
        )?;

        let mut builder = Client::builder();
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?);
        }

        Ok(Self {
            client: builder.build()?,
            token,
            base_url,
            send_interval_ms: config.notify_interval_ms,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Returns the distinct chat ids found in the bot's pending updates.
    pub async fn chat_ids(&self) -> Result<Vec<i64>> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .send()
            .await
            .context("Failed to fetch Telegram updates")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Telegram getUpdates returned status: {}", status);
        }

        let text = response.text().await.context("Failed to read response body")?;
        let updates: UpdatesResponse =
            serde_json::from_str(&text).context("Telegram returned invalid JSON")?;

        let ids: BTreeSet<i64> =
            updates.result.into_iter().filter_map(|u| u.message).map(|m| m.chat.id).collect();

        info!("Fetched {} Telegram subscribers", ids.len());
        Ok(ids.into_iter().collect())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        })
        .to_string();

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram returned status {}: {}", status, detail);
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn broadcast(&self, message: &str) -> Result<usize> {
        let chat_ids = self.chat_ids().await?;
        let mut delivered = 0;

        for (i, chat_id) in chat_ids.iter().enumerate() {
            // Telegram rate-limits bursts from one bot
            if i > 0 {
                throttle::pause(self.send_interval_ms, 0).await;
            }

            match self.send(*chat_id, message).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Telegram send to {} failed: {:#}", chat_id, e),
            }
        }

        info!("Delivered alert to {}/{} chats", delivered, chat_ids.len());
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config {
            telegram_bot_token: Some("123:abc".to_string()),
            notify_interval_ms: 0,
            ..Config::default()
        }
    }

    fn updates_body() -> serde_json::Value {
        json!({
            "ok": true,
            "result": [
                { "update_id": 1, "message": { "message_id": 1, "chat": { "id": 42, "type": "private" }, "text": "/start" } },
                { "update_id": 2, "message": { "message_id": 2, "chat": { "id": 7, "type": "private" }, "text": "/start" } },
                { "update_id": 3, "message": { "message_id": 3, "chat": { "id": 42, "type": "private" }, "text": "hi" } },
                { "update_id": 4, "my_chat_member": { "chat": { "id": 99 } } }
            ]
        })
    }

    async fn mount_updates(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/bot123:abc/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(updates_body()))
            .mount(server)
            .await;
    }

    #[test]
    fn test_requires_token() {
        let err = TelegramClient::new(&Config::default()).err().unwrap();
        assert!(err.to_string().contains("Telegram bot token"));
    }

    #[tokio::test]
    async fn test_chat_ids_are_distinct() {
        let mock_server = MockServer::start().await;
        mount_updates(&mock_server).await;

        let client = TelegramClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        assert_eq!(client.chat_ids().await.unwrap(), vec![7, 42]);
    }

    #[tokio::test]
    async fn test_broadcast_sends_to_each_chat() {
        let mock_server = MockServer::start().await;
        mount_updates(&mock_server).await;

        for chat_id in [7, 42] {
            Mock::given(method("POST"))
                .and(path("/bot123:abc/sendMessage"))
                .and(body_partial_json(json!({
                    "chat_id": chat_id,
                    "text": "❌ No stock available currently.",
                    "parse_mode": "Markdown",
                    "disable_web_page_preview": true
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = TelegramClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let delivered = client.broadcast("❌ No stock available currently.").await.unwrap();
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn test_broadcast_continues_after_failed_send() {
        let mock_server = MockServer::start().await;
        mount_updates(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({ "chat_id": 7 })))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({ "chat_id": 42 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&mock_server)
            .await;

        let client = TelegramClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        assert_eq!(client.broadcast("alert").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_fails_when_updates_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = TelegramClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let err = client.broadcast("alert").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
