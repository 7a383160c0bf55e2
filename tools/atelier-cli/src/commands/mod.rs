//! CLI command implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod init;
pub mod orders;

use atelier_commerce::order::OrderStatus;
use atelier_commerce::Money;
use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short, long)]
    pub force: bool,

    /// Config file format.
    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

/// Format of the file written by `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// Commented atelier.toml.
    Toml,
    /// atelier.json with every default spelled out.
    Json,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a catalog product to the cart.
    Add {
        /// Product id.
        product: String,
        /// Variant label, required when the product has variants.
        #[arg(long)]
        variant: Option<String>,
        /// Quantity; anything below 1 counts as 1.
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a line.
    Remove {
        /// Product id.
        product: String,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Change a line's quantity by a signed delta.
    Update {
        /// Product id.
        product: String,
        /// Amount to add, e.g. 2 or -1.
        #[arg(allow_negative_numbers = true)]
        delta: i64,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Empty the cart.
    Clear,
    /// Show cart contents.
    Show,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Add or replace a product.
    Add {
        /// Product id.
        id: String,
        /// Display title.
        title: String,
        /// Unit price, e.g. 150 or 149.50.
        price: Money,
        /// Primary image URL.
        #[arg(short, long, default_value = "")]
        image: String,
        /// Variant label; repeat for several.
        #[arg(long = "variant")]
        variants: Vec<String>,
    },
    /// List products.
    List,
    /// Change a product's price.
    Price {
        /// Product id.
        id: String,
        /// New unit price.
        price: Money,
    },
    /// Remove a product. Carts and placed orders keep their snapshot.
    Remove {
        /// Product id.
        id: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Contact phone.
    #[arg(long)]
    pub phone: String,

    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,

    /// Delivery address.
    #[arg(long)]
    pub address: String,

    /// Delivery city.
    #[arg(long)]
    pub city: String,

    /// Total shown to the customer (defaults to the cart total).
    #[arg(long)]
    pub total: Option<Money>,

    /// Checkout attempt token; reuse it to retry without duplicating.
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// Show one order.
    Show {
        /// Order id.
        id: String,
    },
    /// Cancel an order as the customer.
    Cancel {
        /// Order id.
        id: String,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Orders placed with an account email.
    Mine {
        /// Signed-in customer's email.
        #[arg(long)]
        email: String,
    },
    /// Find orders by phone number; a single match opens its detail.
    Track {
        /// Part of the phone number.
        phone: String,
    },
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Set an order's status directly.
    Status {
        /// Order id.
        id: String,
        /// pending, processing, shipped, delivered or cancelled.
        status: OrderStatus,
    },
    /// Move an order one step forward.
    Advance {
        /// Order id.
        id: String,
    },
}
