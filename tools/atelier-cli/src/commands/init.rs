//! Write a starter config file.

use anyhow::{bail, Result};

use super::{ConfigFormat, InitArgs};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let name = match args.format {
        ConfigFormat::Toml => "atelier.toml",
        ConfigFormat::Json => "atelier.json",
    };
    let path = ctx.cwd.join(name);
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    match args.format {
        ConfigFormat::Toml => std::fs::write(&path, generate_default_config())?,
        ConfigFormat::Json => CliConfig::default().save(&path.to_string_lossy())?,
    }
    ctx.output.success(&format!("Wrote {}", path.display()));
    Ok(())
}
