//! Customer-side order commands.

use anyhow::Result;
use atelier_commerce::identity::Identity;
use atelier_commerce::order::LookupOutcome;
use atelier_commerce::OrderId;
use dialoguer::Confirm;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;

    match args.command {
        OrdersCommand::Show { id } => {
            let order = services.lookup.order_detail(&OrderId::new(id)).await?;
            ctx.output.order_detail(&order);
        }
        OrdersCommand::Cancel { id, yes } => {
            let id = OrderId::new(id);
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Cancel order {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cancellation aborted");
                    return Ok(());
                }
            }
            let order = services.status.cancel_order(&id).await?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                ctx.output.success(&format!(
                    "Order {} is now {}",
                    order.id,
                    status_badge(order.status)
                ));
            }
        }
        OrdersCommand::Mine { email } => {
            let orders = services
                .lookup
                .by_account(&Identity::customer(email))
                .await?;
            if ctx.output.is_json() {
                ctx.output.json(&orders);
            } else if orders.is_empty() {
                ctx.output.info("No orders for this account");
            } else {
                ctx.output.order_rows(&orders);
            }
        }
        OrdersCommand::Track { phone } => {
            match services.lookup.resolve_phone_lookup(&phone).await? {
                LookupOutcome::Single(order) => ctx.output.order_detail(&order),
                LookupOutcome::Many(orders) if ctx.output.is_json() => ctx.output.json(&orders),
                LookupOutcome::Many(orders) => {
                    ctx.output
                        .info(&format!("{} orders match this number", orders.len()));
                    ctx.output.order_rows(&orders);
                }
                LookupOutcome::Empty if ctx.output.is_json() => {
                    ctx.output.json(&Vec::<()>::new())
                }
                LookupOutcome::Empty => ctx.output.info("No orders match this number"),
            }
        }
    }

    Ok(())
}
