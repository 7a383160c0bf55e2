//! Atelier CLI - drive the cart-to-order lifecycle from the terminal.
//!
//! Commands:
//! - `atelier init` - Write a starter atelier.toml
//! - `atelier catalog` - Manage the local product catalog
//! - `atelier cart` - Add, update, remove and show cart lines
//! - `atelier checkout` - Turn the cart into an order
//! - `atelier orders` - Show, cancel and look up orders
//! - `atelier admin` - Staff status updates

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use atelier_commerce::CommerceError;
use clap::{Parser, Subcommand};

use commands::{AdminArgs, CartArgs, CatalogArgs, CheckoutArgs, InitArgs, OrdersArgs};

/// Atelier CLI - cart, checkout and order tracking for the storefront
#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter atelier.toml in the current directory
    Init(InitArgs),

    /// Manage the local product catalog
    Catalog(CatalogArgs),

    /// Work with the shopping cart
    Cart(CartArgs),

    /// Place an order from the cart
    Checkout(CheckoutArgs),

    /// Show, cancel and look up orders
    Orders(OrdersArgs),

    /// Staff order operations
    Admin(AdminArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;
    logging::init(&ctx.config.logging, cli.verbose)?;

    // Execute command
    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<CommerceError>() {
            Some(commerce) => {
                ctx.output.error(&commerce.user_message());
                ctx.output.debug(&format!("{:#}", e));
            }
            None => ctx.output.error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }

    Ok(())
}
