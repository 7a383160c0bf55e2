//! Staff order commands.

use anyhow::Result;
use atelier_commerce::OrderId;

use super::{AdminArgs, AdminCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let services = ctx.services().await?;

    let order = match args.command {
        AdminCommand::Status { id, status } => {
            services
                .status
                .set_status(&OrderId::new(id), status)
                .await?
        }
        AdminCommand::Advance { id } => services.status.advance(&OrderId::new(id)).await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&order);
    } else {
        ctx.output.success(&format!(
            "Order {} is now {}",
            order.id,
            status_badge(order.status)
        ));
    }
    Ok(())
}
