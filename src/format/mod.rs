//! Output formatting for descriptors, tracked products and stock reports
//! (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::stores::{ProductDescriptor, StoreType, TrackedProduct};
use crate::tracker::StockStatus;

/// Formats results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single resolved descriptor.
    pub fn format_descriptor(&self, descriptor: &ProductDescriptor) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(descriptor).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("Name:        {}", descriptor.name),
                    format!("Store:       {}", descriptor.store_type),
                    format!("Product ID:  {}", descriptor.product_id),
                ];
                if let Some(part) = &descriptor.part_number {
                    lines.push(format!("Part number: {}", part));
                }
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = vec![
                    format!("## {}", descriptor.name),
                    String::new(),
                    format!("- **Store:** {}", descriptor.store_type),
                    format!("- **Product ID:** {}", descriptor.product_id),
                ];
                if let Some(part) = &descriptor.part_number {
                    lines.push(format!("- **Part number:** {}", part));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let row = [
                    Self::csv_escape(&descriptor.name),
                    descriptor.store_type.to_string(),
                    Self::csv_escape(&descriptor.product_id),
                    descriptor.part_number.as_deref().map(Self::csv_escape).unwrap_or_default(),
                ];
                format!("name,store,product_id,part_number\n{}", row.join(","))
            }
        }
    }

    /// Formats the tracked product list.
    pub fn format_tracked(&self, products: &[TrackedProduct]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::TRACKED_CSV_HEADER.to_string(),
                _ => "No products tracked.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_tracked(products),
            OutputFormat::Markdown => self.markdown_tracked(products),
            OutputFormat::Csv => self.csv_tracked(products),
        }
    }

    /// Formats a stock check report.
    pub fn format_stock(&self, statuses: &[StockStatus]) -> String {
        if statuses.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::STOCK_CSV_HEADER.to_string(),
                _ => "No Croma or Amazon products tracked.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(statuses).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_stock(statuses),
            OutputFormat::Markdown => Self::alert_message(statuses),
            OutputFormat::Csv => self.csv_stock(statuses),
        }
    }

    /// Builds the Telegram-flavoured markdown alert for a stock check.
    ///
    /// Lists every available product, or reports that nothing is available
    /// along with how many lookups failed.
    pub fn alert_message(statuses: &[StockStatus]) -> String {
        let found: Vec<String> = statuses.iter().filter_map(Self::alert_entry).collect();

        if !found.is_empty() {
            return format!("🔥 *Stock Alert!*\n\n{}", found.join("\n\n"));
        }

        let (amazon_failed, amazon_total) = Self::failures(statuses, StoreType::Amazon);
        let mut message = format!(
            "❌ No stock available currently.\nAmazon API failed for {}/{} products.",
            amazon_failed, amazon_total
        );

        let (croma_failed, croma_total) = Self::failures(statuses, StoreType::Croma);
        if croma_failed > 0 {
            message.push_str(&format!(
                "\nCroma check failed for {}/{} products.",
                croma_failed, croma_total
            ));
        }

        message
    }

    fn alert_entry(status: &StockStatus) -> Option<String> {
        if let Some(pincode) = &status.available_at {
            return Some(format!(
                "✅ *In Stock at Croma ({})*\n[{}]({})",
                pincode, status.name, status.link
            ));
        }

        status.offer.as_ref().map(|offer| {
            format!(
                "🛒 *Amazon*\n[{}]({})\n💰 {}\n📦 {}",
                offer.title, status.link, offer.price, offer.availability
            )
        })
    }

    /// Counts failed checks and total checks for one store.
    fn failures(statuses: &[StockStatus], store: StoreType) -> (usize, usize) {
        let checked = statuses.iter().filter(|s| s.store_type == store);
        let failed = checked.clone().filter(|s| s.error.is_some()).count();
        (failed, checked.count())
    }

    // Table formatting

    fn table_tracked(&self, products: &[TrackedProduct]) -> String {
        let store_width = 16;
        let id_width = 26;

        let mut lines = vec![
            format!("{:<store_width$}  {:<id_width$}  {}", "Store", "Product ID", "Name"),
            format!("{:-<store_width$}  {:-<id_width$}  {:-<40}", "", "", ""),
        ];

        for product in products {
            lines.push(format!(
                "{:<store_width$}  {:<id_width$}  {}",
                product.store_type.to_string(),
                product.product_id,
                product.name
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));
        lines.join("\n")
    }

    fn table_stock(&self, statuses: &[StockStatus]) -> String {
        let mut lines = Vec::new();

        for status in statuses {
            let state = match (&status.available_at, &status.offer, &status.error) {
                (Some(pincode), _, _) => format!("In stock ({})", pincode),
                (None, Some(offer), _) => format!("{} ({})", offer.availability, offer.price),
                (None, None, Some(err)) => format!("Check failed: {}", err),
                (None, None, None) => "Out of stock".to_string(),
            };
            lines.push(format!(
                "{:<8}  {:<32}  {}",
                status.store_type.to_string(),
                state,
                status.name
            ));
        }

        let in_stock = statuses.iter().filter(|s| s.in_stock()).count();
        lines.push(String::new());
        lines.push(format!("{}/{} products in stock", in_stock, statuses.len()));
        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_tracked(&self, products: &[TrackedProduct]) -> String {
        let mut lines = vec![
            "| Store | Product ID | Name |".to_string(),
            "|-------|------------|------|".to_string(),
        ];

        for product in products {
            lines.push(format!(
                "| {} | {} | [{}]({}) |",
                product.store_type,
                product.product_id,
                product.name,
                product.link()
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products tracked*", products.len()));
        lines.join("\n")
    }

    // CSV formatting

    const TRACKED_CSV_HEADER: &'static str =
        "store,product_id,part_number,name,url,affiliate_link";

    const STOCK_CSV_HEADER: &'static str =
        "store,product_id,in_stock,pincode,price,availability,error,name,link";

    fn csv_tracked(&self, products: &[TrackedProduct]) -> String {
        let mut lines = vec![Self::TRACKED_CSV_HEADER.to_string()];

        for product in products {
            lines.push(format!(
                "{},{},{},{},{},{}",
                product.store_type,
                Self::csv_escape(&product.product_id),
                product.part_number.as_deref().map(Self::csv_escape).unwrap_or_default(),
                Self::csv_escape(&product.name),
                Self::csv_escape(&product.url),
                product.affiliate_link.as_deref().map(Self::csv_escape).unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_stock(&self, statuses: &[StockStatus]) -> String {
        let mut lines = vec![Self::STOCK_CSV_HEADER.to_string()];

        for status in statuses {
            let offer = status.offer.as_ref();
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{}",
                status.store_type,
                Self::csv_escape(&status.product_id),
                status.in_stock(),
                status.available_at.as_deref().unwrap_or_default(),
                offer.map(|o| Self::csv_escape(&o.price)).unwrap_or_default(),
                offer.map(|o| Self::csv_escape(&o.availability)).unwrap_or_default(),
                status.error.as_deref().map(Self::csv_escape).unwrap_or_default(),
                Self::csv_escape(&status.name),
                Self::csv_escape(&status.link)
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
