//! Output formatting for the CLI.

use atelier_commerce::order::{Order, OrderStatus};
use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print one summary row per order.
    pub fn order_rows(&self, orders: &[Order]) {
        const WIDTHS: [usize; 4] = [28, 17, 12, 10];
        self.table_row(&["ORDER", "PLACED", "STATUS", "TOTAL"], &WIDTHS);
        for order in orders {
            let placed = order.created_at.format("%Y-%m-%d %H:%M").to_string();
            let total = order.total.to_string();
            self.table_row(
                &[order.id.as_str(), &placed, &status_badge(order.status), &total],
                &WIDTHS,
            );
        }
    }

    /// Print an order's detail view.
    pub fn order_detail(&self, order: &Order) {
        if self.json {
            self.json(order);
            return;
        }
        self.header(&format!("Order {}", order.id));
        self.kv("Status", &status_badge(order.status));
        self.kv("Placed", &order.created_at.to_rfc3339());
        self.kv("Customer", &order.customer_name);
        self.kv("Phone", &order.customer_phone);
        if let Some(email) = &order.customer_email {
            self.kv("Email", email);
        }
        self.kv("Deliver to", &format!("{}, {}", order.address, order.city));
        println!();
        for line in order.items.lines() {
            let variant = line
                .variant
                .as_deref()
                .map(|v| format!(" ({})", v))
                .unwrap_or_default();
            println!(
                "  {} × {}{} @ {} = {}",
                line.quantity,
                line.title,
                variant,
                line.unit_price,
                line.subtotal()
            );
        }
        println!(
            "  {}",
            style(format!("Total: {} ({} items)", order.total, order.item_count())).bold()
        );
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored storefront label for an order status.
pub fn status_badge(status: OrderStatus) -> String {
    let label = status.label();
    match status {
        OrderStatus::Pending => style(label).yellow().to_string(),
        OrderStatus::Processing => style(label).cyan().to_string(),
        OrderStatus::Shipped => style(label).blue().to_string(),
        OrderStatus::Delivered => style(label).green().to_string(),
        OrderStatus::Cancelled => style(label).dim().to_string(),
    }
}
