//! stock-tracker - Track Indian e-commerce products by URL

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stock_tracker::commands::{CheckCommand, ResolveCommand, TrackedCommand};
use stock_tracker::config::{Config, OutputFormat};
use stock_tracker::stores::StoreType;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stock-tracker",
    version,
    about = "Track e-commerce products by URL",
    long_about = "Resolve product URLs from Amazon, Flipkart, Croma, Apple, Vivo, iQOO and Reliance Digital into tracked products, check Croma and Amazon availability, and alert Telegram subscribers."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "TRACKER_PROXY")]
    proxy: Option<String>,

    /// Tracked products file
    #[arg(long, global = true, env = "TRACKER_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a product URL without tracking it
    #[command(alias = "r")]
    Resolve {
        /// Product URL
        url: String,

        /// Part number, required for Apple products
        #[arg(short, long)]
        part_number: Option<String>,
    },

    /// Resolve a product URL and start tracking it
    #[command(alias = "a")]
    Add {
        /// Product URL
        url: String,

        /// Part number, required for Apple products
        #[arg(short, long)]
        part_number: Option<String>,
    },

    /// List tracked products
    #[command(alias = "ls")]
    List,

    /// Stop tracking a product
    #[command(alias = "rm")]
    Remove {
        /// Store the product belongs to
        store: StoreType,

        /// Store product id
        product_id: String,
    },

    /// Check Croma and Amazon availability of tracked products
    Check {
        /// Pincodes to check (comma-separated), overriding the config
        #[arg(long, value_delimiter = ',')]
        pincodes: Option<Vec<String>>,

        /// Send the result to Telegram subscribers
        #[arg(long)]
        notify: bool,
    },

    /// List supported stores
    Stores,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = Some(data_file);
    }

    match cli.command {
        Commands::Resolve { url, part_number } => {
            let cmd = ResolveCommand::new(config);
            let output = cmd.execute(&url, part_number.as_deref()).await?;
            println!("{}", output);
        }

        Commands::Add { url, part_number } => {
            let cmd = ResolveCommand::new(config);
            let output = cmd.add(&url, part_number.as_deref()).await?;
            println!("{}", output);
        }

        Commands::List => {
            let cmd = TrackedCommand::new(config);
            println!("{}", cmd.list()?);
        }

        Commands::Remove { store, product_id } => {
            let cmd = TrackedCommand::new(config);
            println!("{}", cmd.remove(store, &product_id)?);
        }

        Commands::Check { pincodes, notify } => {
            if let Some(pincodes) = pincodes {
                config.pincodes = pincodes;
            }

            let cmd = CheckCommand::new(config);
            let output = cmd.execute(notify).await?;
            println!("{}", output);
        }

        Commands::Stores => {
            println!("Supported stores:\n");
            println!("{:<18} {:<14} {:<20}", "Store", "Label", "Host signature");
            println!("{:-<18} {:-<14} {:-<20}", "", "", "");

            for store in StoreType::all() {
                println!(
                    "{:<18} {:<14} {:<20}",
                    store.to_string(),
                    store.label(),
                    store.signature()
                );
            }
        }
    }

    Ok(())
}
