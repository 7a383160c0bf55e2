//! Cart commands.

use anyhow::{anyhow, Result};
use atelier_cache::FileKv;
use atelier_commerce::cart::CartStore;
use atelier_commerce::catalog::Catalog;
use atelier_commerce::ProductId;
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;

    match args.command {
        CartCommand::Add {
            product,
            variant,
            qty,
        } => {
            let catalog = ctx.catalog()?;
            let snapshot = catalog
                .snapshot(&ProductId::new(&product))
                .ok_or_else(|| anyhow!("Unknown product: {}", product))?;
            cart.add_product(&snapshot, variant.as_deref(), qty)?;
            ctx.output.success(&format!("Added {} to cart", snapshot.title));
        }
        CartCommand::Remove { product, variant } => {
            cart.remove_item(&ProductId::new(product), variant.as_deref());
        }
        CartCommand::Update {
            product,
            delta,
            variant,
        } => {
            cart.update_quantity(&ProductId::new(product), variant.as_deref(), delta);
        }
        CartCommand::Clear => {
            cart.clear_cart();
            ctx.output.success("Cart cleared");
        }
        CartCommand::Show => {}
    }

    show(&cart, ctx);
    Ok(())
}

fn show(cart: &CartStore<FileKv>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "lines": cart.lines(),
            "item_count": cart.item_count(),
            "total": cart.total(),
        }));
        return;
    }

    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    ctx.output.header("Cart");
    const WIDTHS: [usize; 5] = [20, 28, 10, 4, 10];
    ctx.output
        .table_row(&["PRODUCT", "TITLE", "VARIANT", "QTY", "SUBTOTAL"], &WIDTHS);
    for line in cart.lines() {
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                &line.title,
                line.variant.as_deref().unwrap_or("-"),
                &line.quantity.to_string(),
                &line.subtotal().to_string(),
            ],
            &WIDTHS,
        );
    }
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &cart.total().to_string());
}
