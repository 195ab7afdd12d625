//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "stock-tracker";

/// Mobile browser signature; Reliance Digital only exposes item codes to mobile clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// User-Agent sent when scraping product pages
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Tracked products file (defaults to the XDG data directory)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Amazon Associates tag used for affiliate links
    #[serde(default)]
    pub amazon_tag: Option<String>,

    /// Flipkart affiliate id used for affiliate links
    #[serde(default)]
    pub flipkart_affiliate_id: Option<String>,

    /// Subscription key for the Croma inventory API
    #[serde(default)]
    pub croma_api_key: Option<String>,

    /// AWS access key for Product Advertising API lookups
    #[serde(default)]
    pub aws_access_key_id: Option<String>,

    /// AWS secret key for Product Advertising API lookups
    #[serde(default)]
    pub aws_secret_access_key: Option<String>,

    /// Telegram bot token used for stock alerts
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Pause between Telegram messages in milliseconds
    #[serde(default = "default_notify_interval_ms")]
    pub notify_interval_ms: u64,

    /// Pincodes to check Croma availability for, in order
    #[serde(default = "default_pincodes")]
    pub pincodes: Vec<String>,

    /// Base delay between stock checks in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_pincodes() -> Vec<String> {
    vec!["132001".to_string()]
}

fn default_notify_interval_ms() -> u64 {
    500
}

fn default_delay_ms() -> u64 {
    500
}

fn default_delay_jitter_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            proxy: None,
            user_agent: default_user_agent(),
            data_file: None,
            amazon_tag: None,
            flipkart_affiliate_id: None,
            croma_api_key: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            telegram_bot_token: None,
            notify_interval_ms: default_notify_interval_ms(),
            pincodes: default_pincodes(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_DIR).join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("TRACKER_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(user_agent) = std::env::var("TRACKER_USER_AGENT") {
            self.user_agent = user_agent;
        }

        if let Ok(path) = std::env::var("TRACKER_DATA_FILE") {
            self.data_file = Some(PathBuf::from(path));
        }

        if let Ok(tag) = std::env::var("TRACKER_AMAZON_TAG") {
            self.amazon_tag = Some(tag);
        }

        if let Ok(affid) = std::env::var("TRACKER_FLIPKART_AFFID") {
            self.flipkart_affiliate_id = Some(affid);
        }

        if let Ok(key) = std::env::var("TRACKER_CROMA_KEY") {
            self.croma_api_key = Some(key);
        }

        if let Ok(key) = std::env::var("TRACKER_AWS_ACCESS_KEY") {
            self.aws_access_key_id = Some(key);
        }

        if let Ok(key) = std::env::var("TRACKER_AWS_SECRET_KEY") {
            self.aws_secret_access_key = Some(key);
        }

        if let Ok(token) = std::env::var("TRACKER_TELEGRAM_TOKEN") {
            self.telegram_bot_token = Some(token);
        }

        if let Ok(delay) = std::env::var("TRACKER_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }

    /// Returns the tracked products file, falling back to the XDG data directory.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir().context("Could not determine a data directory")?;
        Ok(data_dir.join(APP_DIR).join("products.json"))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
