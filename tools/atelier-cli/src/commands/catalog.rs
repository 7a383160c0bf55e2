//! Local catalog commands.

use anyhow::{bail, Result};
use atelier_commerce::catalog::ProductSnapshot;
use atelier_commerce::ProductId;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;

    match args.command {
        CatalogCommand::Add {
            id,
            title,
            price,
            image,
            variants,
        } => {
            let product = ProductSnapshot::new(id, title, price, image).with_variants(variants);
            let saved = format!("Saved {} at {}", product.id, product.unit_price);
            catalog.upsert(product);
            ctx.save_catalog(&catalog)?;
            ctx.output.success(&saved);
        }
        CatalogCommand::Price { id, price } => {
            if !catalog.set_price(&ProductId::new(&id), price) {
                bail!("Unknown product: {}", id);
            }
            ctx.save_catalog(&catalog)?;
            ctx.output.success(&format!("{} now costs {}", id, price));
        }
        CatalogCommand::Remove { id } => {
            if !catalog.remove(&ProductId::new(&id)) {
                bail!("Unknown product: {}", id);
            }
            ctx.save_catalog(&catalog)?;
            ctx.output.success(&format!("Removed {}", id));
        }
        CatalogCommand::List => {
            let products = catalog.list();
            if ctx.output.is_json() {
                ctx.output.json(&products);
                return Ok(());
            }
            if products.is_empty() {
                ctx.output.info("Catalog is empty");
                return Ok(());
            }
            const WIDTHS: [usize; 4] = [20, 28, 10, 24];
            ctx.output
                .table_row(&["ID", "TITLE", "PRICE", "VARIANTS"], &WIDTHS);
            for product in &products {
                ctx.output.table_row(
                    &[
                        product.id.as_str(),
                        &product.title,
                        &product.unit_price.to_string(),
                        &product.variants.join(", "),
                    ],
                    &WIDTHS,
                );
            }
        }
    }

    Ok(())
}
