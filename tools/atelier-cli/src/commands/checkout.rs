//! Place an order from the cart.

use anyhow::Result;
use atelier_commerce::checkout::CheckoutDetails;
use atelier_commerce::CheckoutToken;
use serde_json::json;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;
    let services = ctx.services().await?;

    let mut details = CheckoutDetails::new(args.name, args.phone, args.address, args.city);
    details.customer_email = args.email;
    let token = args.token.map(CheckoutToken::new);

    let lines = cart.snapshot();
    let total = args.total.unwrap_or_else(|| cart.total());
    ctx.output
        .debug(&format!("Submitting {} line(s), total {}", lines.len(), total));

    let order_id = services
        .submission
        .place_order(&details, &lines, total, token.as_ref())
        .await?;
    cart.clear_cart();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "order_id": order_id }));
    } else {
        ctx.output.success(&format!("Order placed: {}", order_id));
        ctx.output.kv("Total", &total.to_string());
    }
    Ok(())
}
