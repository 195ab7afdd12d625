//! Stock check command implementation.

use crate::amazon::{OfferLookup, PaapiClient};
use crate::config::Config;
use crate::croma::{CromaClient, StockChecker};
use crate::format::Formatter;
use crate::notify::{Notifier, TelegramClient};
use crate::stores::{StoreType, TrackedProduct};
use crate::throttle;
use crate::tracker::{JsonFileStore, ProductStore, StockStatus};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Checks availability of tracked Croma and Amazon products.
pub struct CheckCommand {
    config: Config,
}

fn tracks(products: &[TrackedProduct], store: StoreType) -> bool {
    products.iter().any(|p| p.store_type == store)
}

impl CheckCommand {
    /// Creates a new check command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Checks all tracked products and returns a formatted report.
    ///
    /// Clients are only built for stores that have tracked products. With
    /// `notify`, the alert is also broadcast to Telegram subscribers.
    pub async fn execute(&self, notify: bool) -> Result<String> {
        let store = JsonFileStore::new(self.config.data_path()?);
        let products = store.list().context("Failed to load tracked products")?;

        let notifier = if notify {
            Some(TelegramClient::new(&self.config).context("Failed to create Telegram client")?)
        } else {
            None
        };

        let croma = if tracks(&products, StoreType::Croma) {
            Some(CromaClient::new(&self.config).context("Failed to create Croma client")?)
        } else {
            None
        };

        let amazon = if tracks(&products, StoreType::Amazon) {
            Some(PaapiClient::new(&self.config).context("Failed to create Amazon client")?)
        } else {
            None
        };

        let statuses = self.check(&products, croma.as_ref(), amazon.as_ref()).await?;

        if let Some(notifier) = &notifier {
            match self.notify_with(notifier, &statuses).await {
                Ok(delivered) => info!("Stock alert delivered to {} chats", delivered),
                Err(e) => warn!("Failed to send stock alert: {:#}", e),
            }
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_stock(&statuses))
    }

    /// Runs the check with provided clients and store (for testing).
    pub async fn execute_with(
        &self,
        croma: &impl StockChecker,
        amazon: &impl OfferLookup,
        store: &impl ProductStore,
    ) -> Result<String> {
        let products = store.list().context("Failed to load tracked products")?;
        let statuses = self.check(&products, Some(croma), Some(amazon)).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_stock(&statuses))
    }

    /// Checks Croma and Amazon products in order. Products of other stores,
    /// or of a store without a client, are skipped.
    pub async fn check<C: StockChecker, A: OfferLookup>(
        &self,
        products: &[TrackedProduct],
        croma: Option<&C>,
        amazon: Option<&A>,
    ) -> Result<Vec<StockStatus>> {
        if self.config.pincodes.is_empty() && tracks(products, StoreType::Croma) {
            anyhow::bail!("No pincodes configured for the Croma check");
        }

        let mut statuses = Vec::new();
        let mut first_request = true;

        for product in products {
            let status = match (product.store_type, croma, amazon) {
                (StoreType::Croma, Some(croma), _) => {
                    self.check_croma(croma, product, &mut first_request).await
                }
                (StoreType::Amazon, _, Some(amazon)) => {
                    self.pace(&mut first_request).await;
                    self.check_amazon(amazon, product).await
                }
                _ => continue,
            };
            statuses.push(status);
        }

        info!(
            "Checked {} products, {} in stock",
            statuses.len(),
            statuses.iter().filter(|s| s.in_stock()).count()
        );
        Ok(statuses)
    }

    /// Broadcasts the stock alert for `statuses` and returns how many chats received it.
    pub async fn notify_with(
        &self,
        notifier: &impl Notifier,
        statuses: &[StockStatus],
    ) -> Result<usize> {
        let message = Formatter::alert_message(statuses);
        debug!("Broadcasting alert:\n{}", message);
        notifier.broadcast(&message).await
    }

    async fn check_croma(
        &self,
        checker: &impl StockChecker,
        product: &TrackedProduct,
        first_request: &mut bool,
    ) -> StockStatus {
        let mut status = StockStatus::for_product(product);
        let mut checked = false;

        for pincode in &self.config.pincodes {
            self.pace(first_request).await;

            match checker.in_stock(&product.product_id, pincode).await {
                Ok(true) => {
                    info!("{} in stock at {}", product.product_id, pincode);
                    status.available_at = Some(pincode.clone());
                    checked = true;
                    break;
                }
                Ok(false) => {
                    debug!("{} unavailable at {}", product.product_id, pincode);
                    checked = true;
                }
                Err(e) => {
                    warn!("Croma check failed for {}: {:#}", product.name, e);
                    status.error = Some(format!("{:#}", e));
                }
            }
        }

        if checked {
            status.error = None;
        }
        status
    }

    async fn check_amazon(&self, lookup: &impl OfferLookup, product: &TrackedProduct) -> StockStatus {
        let mut status = StockStatus::for_product(product);

        match lookup.lookup(&product.product_id).await {
            Ok(offer) => {
                info!("{} listed: {} at {}", product.product_id, offer.availability, offer.price);
                status.offer = Some(offer);
            }
            Err(e) => {
                warn!("Amazon check failed for {}: {:#}", product.name, e);
                status.error = Some(format!("{:#}", e));
            }
        }

        status
    }

    /// Waits between requests; the first request goes out immediately.
    async fn pace(&self, first_request: &mut bool) {
        if !*first_request {
            throttle::pause(self.config.delay_ms, self.config.delay_jitter_ms).await;
        }
        *first_request = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::AmazonOffer;
    use crate::config::OutputFormat;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Mock checker answering per (item, pincode), recording calls.
    struct MockChecker {
        answers: HashMap<(String, String), bool>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockChecker {
        fn new(answers: &[(&str, &str, bool)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(id, pin, ok)| ((id.to_string(), pin.to_string()), *ok))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StockChecker for MockChecker {
        async fn in_stock(&self, item_id: &str, pincode: &str) -> Result<bool> {
            self.calls.lock().unwrap().push((item_id.to_string(), pincode.to_string()));
            match self.answers.get(&(item_id.to_string(), pincode.to_string())) {
                Some(ok) => Ok(*ok),
                None => anyhow::bail!("Croma returned status: 500 Internal Server Error"),
            }
        }
    }

    /// Mock offer lookup listing only the given ASINs.
    struct MockLookup {
        listed: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn new(listed: &[&str]) -> Self {
            Self {
                listed: listed.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OfferLookup for MockLookup {
        async fn lookup(&self, asin: &str) -> Result<AmazonOffer> {
            self.calls.lock().unwrap().push(asin.to_string());
            if !self.listed.iter().any(|a| a == asin) {
                anyhow::bail!("PA-API error ItemNotAccessible: not accessible");
            }
            Ok(AmazonOffer {
                title: format!("Item {}", asin),
                price: "₹1,299.00".to_string(),
                availability: "In stock".to_string(),
            })
        }
    }

    /// Mock notifier recording broadcast messages.
    struct MockNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn broadcast(&self, message: &str) -> Result<usize> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(3)
        }
    }

    fn make_test_config(pincodes: &[&str]) -> Config {
        Config {
            pincodes: pincodes.iter().map(|p| p.to_string()).collect(),
            delay_ms: 0,
            delay_jitter_ms: 0,
            ..Config::default()
        }
    }

    fn tracked(store_type: StoreType, id: &str) -> TrackedProduct {
        TrackedProduct {
            name: format!("{} item {}...", store_type.label(), id),
            url: format!("https://example.com/p/{}", id),
            product_id: id.to_string(),
            store_type,
            part_number: None,
            affiliate_link: None,
        }
    }

    fn seeded_store(dir: &TempDir, products: &[TrackedProduct]) -> JsonFileStore {
        let store = JsonFileStore::new(dir.path().join("products.json"));
        for product in products {
            store.add(product.clone()).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_only_croma_and_amazon_checked() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(
            &dir,
            &[
                tracked(StoreType::Croma, "300652"),
                tracked(StoreType::Amazon, "B0CX59H5W7"),
                tracked(StoreType::Flipkart, "ABCD12345"),
            ],
        );
        let checker = MockChecker::new(&[("300652", "132001", true)]);
        let lookup = MockLookup::new(&["B0CX59H5W7"]);
        let cmd = CheckCommand::new(make_test_config(&["132001"]));

        let output = cmd.execute_with(&checker, &lookup, &store).await.unwrap();

        assert!(output.contains("In stock (132001)"));
        assert!(output.contains("In stock (₹1,299.00)"));
        assert!(output.contains("2/2 products in stock"));
        assert_eq!(checker.calls.lock().unwrap().len(), 1);
        assert_eq!(*lookup.calls.lock().unwrap(), vec!["B0CX59H5W7".to_string()]);
    }

    #[tokio::test]
    async fn test_stops_at_first_available_pincode() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, &[tracked(StoreType::Croma, "300652")]);
        let checker = MockChecker::new(&[
            ("300652", "110001", false),
            ("300652", "400001", true),
            ("300652", "560001", true),
        ]);
        let cmd = CheckCommand::new(make_test_config(&["110001", "400001", "560001"]));

        let output = cmd.execute_with(&checker, &MockLookup::new(&[]), &store).await.unwrap();

        assert!(output.contains("In stock (400001)"));
        assert_eq!(checker.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_run() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(
            &dir,
            &[
                tracked(StoreType::Croma, "111111"),
                tracked(StoreType::Amazon, "B000000000"),
                tracked(StoreType::Croma, "300652"),
            ],
        );
        let checker = MockChecker::new(&[("300652", "132001", false)]);
        let mut config = make_test_config(&["132001"]);
        config.format = OutputFormat::Json;
        let cmd = CheckCommand::new(config);

        let output = cmd.execute_with(&checker, &MockLookup::new(&[]), &store).await.unwrap();
        let statuses: Vec<StockStatus> = serde_json::from_str(&output).unwrap();

        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].error.as_deref().unwrap().contains("500"));
        assert!(statuses[1].error.as_deref().unwrap().contains("ItemNotAccessible"));
        assert!(statuses[2].error.is_none());
        assert!(!statuses[2].in_stock());
    }

    #[tokio::test]
    async fn test_error_cleared_when_another_pincode_answers() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, &[tracked(StoreType::Croma, "300652")]);
        let checker = MockChecker::new(&[("300652", "400001", false)]);
        let mut config = make_test_config(&["110001", "400001"]);
        config.format = OutputFormat::Json;
        let cmd = CheckCommand::new(config);

        let output = cmd.execute_with(&checker, &MockLookup::new(&[]), &store).await.unwrap();
        let statuses: Vec<StockStatus> = serde_json::from_str(&output).unwrap();

        assert!(statuses[0].error.is_none());
    }

    #[tokio::test]
    async fn test_amazon_failures_reported_in_markdown() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(
            &dir,
            &[tracked(StoreType::Amazon, "B000000001"), tracked(StoreType::Amazon, "B000000002")],
        );
        let mut config = make_test_config(&["132001"]);
        config.format = OutputFormat::Markdown;
        let cmd = CheckCommand::new(config);

        let output = cmd
            .execute_with(&MockChecker::new(&[]), &MockLookup::new(&[]), &store)
            .await
            .unwrap();

        assert_eq!(output, "❌ No stock available currently.\nAmazon API failed for 2/2 products.");
    }

    #[tokio::test]
    async fn test_empty_pincodes_rejected_for_croma_products() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, &[tracked(StoreType::Croma, "300652")]);
        let checker = MockChecker::new(&[]);
        let cmd = CheckCommand::new(make_test_config(&[]));

        let err = cmd.execute_with(&checker, &MockLookup::new(&[]), &store).await.unwrap_err();

        assert!(err.to_string().contains("No pincodes configured"));
        assert!(checker.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_pincodes_allowed_without_croma_products() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, &[tracked(StoreType::Amazon, "B0CX59H5W7")]);
        let cmd = CheckCommand::new(make_test_config(&[]));

        let output = cmd
            .execute_with(&MockChecker::new(&[]), &MockLookup::new(&["B0CX59H5W7"]), &store)
            .await
            .unwrap();
        assert!(output.contains("1/1 products in stock"));
    }

    #[tokio::test]
    async fn test_store_without_client_is_skipped() {
        let products = [tracked(StoreType::Croma, "300652"), tracked(StoreType::Amazon, "B0CX59H5W7")];
        let lookup = MockLookup::new(&["B0CX59H5W7"]);
        let cmd = CheckCommand::new(make_test_config(&["132001"]));

        let statuses =
            cmd.check(&products, None::<&MockChecker>, Some(&lookup)).await.unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].store_type, StoreType::Amazon);
    }

    #[tokio::test]
    async fn test_nothing_tracked() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, &[]);
        let cmd = CheckCommand::new(make_test_config(&["132001"]));

        let output = cmd
            .execute_with(&MockChecker::new(&[]), &MockLookup::new(&[]), &store)
            .await
            .unwrap();
        assert_eq!(output, "No Croma or Amazon products tracked.");
    }

    #[tokio::test]
    async fn test_notify_sends_alert() {
        let products = [tracked(StoreType::Croma, "300652"), tracked(StoreType::Amazon, "B0CX59H5W7")];
        let checker = MockChecker::new(&[("300652", "132001", true)]);
        let lookup = MockLookup::new(&[]);
        let notifier = MockNotifier { messages: Mutex::new(Vec::new()) };
        let cmd = CheckCommand::new(make_test_config(&["132001"]));

        let statuses = cmd.check(&products, Some(&checker), Some(&lookup)).await.unwrap();
        let delivered = cmd.notify_with(&notifier, &statuses).await.unwrap();

        assert_eq!(delivered, 3);
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("🔥 *Stock Alert!*"));
        assert!(messages[0].contains("✅ *In Stock at Croma (132001)*"));
    }

    #[tokio::test]
    async fn test_notify_sends_no_stock_summary() {
        let products = [tracked(StoreType::Amazon, "B0CX59H5W7")];
        let notifier = MockNotifier { messages: Mutex::new(Vec::new()) };
        let cmd = CheckCommand::new(make_test_config(&["132001"]));

        let statuses = cmd
            .check(&products, Some(&MockChecker::new(&[])), Some(&MockLookup::new(&[])))
            .await
            .unwrap();
        cmd.notify_with(&notifier, &statuses).await.unwrap();

        assert_eq!(
            notifier.messages.lock().unwrap()[0],
            "❌ No stock available currently.\nAmazon API failed for 1/1 products."
        );
    }
}
