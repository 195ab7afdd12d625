//! Integration tests for the stock check against mock Croma, Product
//! Advertising API and Telegram servers.

use serde_json::json;
use stock_tracker::amazon::PaapiClient;
use stock_tracker::commands::CheckCommand;
use stock_tracker::config::OutputFormat;
use stock_tracker::croma::CromaClient;
use stock_tracker::notify::TelegramClient;
use stock_tracker::tracker::{JsonFileStore, ProductStore};
use stock_tracker::{Config, StoreType, TrackedProduct};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_config() -> Config {
    Config {
        croma_api_key: Some("croma-key".to_string()),
        aws_access_key_id: Some("AKIDEXAMPLE".to_string()),
        aws_secret_access_key: Some("secret".to_string()),
        amazon_tag: Some("tracker-21".to_string()),
        telegram_bot_token: Some("123:abc".to_string()),
        notify_interval_ms: 0,
        pincodes: vec!["110001".to_string(), "132001".to_string()],
        delay_ms: 0,
        delay_jitter_ms: 0,
        ..Config::default()
    }
}

fn product(store_type: StoreType, id: &str, name: &str) -> TrackedProduct {
    TrackedProduct {
        name: name.to_string(),
        url: format!("https://example.com/{}", id),
        product_id: id.to_string(),
        store_type,
        part_number: None,
        affiliate_link: None,
    }
}

async fn mount_croma(server: &MockServer, pincode: &str, available: bool) {
    let lines = if available { json!({ "promiseLine": [{ "itemID": "300652" }] }) } else { json!(null) };

    Mock::given(method("POST"))
        .and(path("/inventory/oms/v2/tms/details-pwa/"))
        .and(body_partial_json(json!({
            "promise": { "promiseLines": { "promiseLine": [{ "shipToAddress": { "zipCode": pincode } }] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promise": { "suggestedOption": { "option": { "promiseLines": lines } } }
        })))
        .mount(server)
        .await;
}

async fn mount_paapi(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/paapi5/getitems"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ItemsResult": { "Items": [{
                "ItemInfo": { "Title": { "DisplayValue": "boAt Airdopes 141" } },
                "Offers": { "Listings": [{
                    "Availability": { "Message": "In stock" },
                    "Price": { "DisplayAmount": "₹1,299.00" }
                }] }
            }] }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_check_and_notify_end_to_end() {
    let server = MockServer::start().await;
    mount_croma(&server, "110001", false).await;
    mount_croma(&server, "132001", true).await;
    mount_paapi(&server).await;

    Mock::given(method("GET"))
        .and(path("/bot123:abc/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [{ "update_id": 1, "message": { "chat": { "id": 42 } } }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_string_contains("In Stock at Croma (132001)"))
        .and(body_string_contains("boAt Airdopes 141"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let config = make_config();
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("products.json"));
    store.add(product(StoreType::Croma, "300652", "(Croma) iphone 15...")).unwrap();
    store.add(product(StoreType::Amazon, "B0CX59H5W7", "(Amazon) Airdopes...")).unwrap();
    store.add(product(StoreType::Vivo, "10086", "(Vivo) Vivo Product...")).unwrap();

    let croma = CromaClient::with_base_url(&config, server.uri()).unwrap();
    let amazon = PaapiClient::with_base_url(&config, server.uri()).unwrap();
    let telegram = TelegramClient::with_base_url(&config, server.uri()).unwrap();
    let cmd = CheckCommand::new(config);

    let products = store.list().unwrap();
    let statuses = cmd.check(&products, Some(&croma), Some(&amazon)).await.unwrap();

    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].available_at.as_deref(), Some("132001"));
    assert_eq!(statuses[1].offer.as_ref().unwrap().price, "₹1,299.00");

    assert_eq!(cmd.notify_with(&telegram, &statuses).await.unwrap(), 1);
}

#[tokio::test]
async fn test_check_report_with_real_clients() {
    let server = MockServer::start().await;
    mount_croma(&server, "110001", false).await;
    mount_croma(&server, "132001", false).await;

    Mock::given(method("POST"))
        .and(path("/paapi5/getitems"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "Errors": [{ "Code": "TooManyRequests", "Message": "Throttled" }]
        })))
        .mount(&server)
        .await;

    let mut config = make_config();
    config.format = OutputFormat::Markdown;
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("products.json"));
    store.add(product(StoreType::Croma, "300652", "(Croma) iphone 15...")).unwrap();
    store.add(product(StoreType::Amazon, "B0CX59H5W7", "(Amazon) Airdopes...")).unwrap();

    let croma = CromaClient::with_base_url(&config, server.uri()).unwrap();
    let amazon = PaapiClient::with_base_url(&config, server.uri()).unwrap();
    let cmd = CheckCommand::new(config);

    let output = cmd.execute_with(&croma, &amazon, &store).await.unwrap();
    assert_eq!(output, "❌ No stock available currently.\nAmazon API failed for 1/1 products.");
}
