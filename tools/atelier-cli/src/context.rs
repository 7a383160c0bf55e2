//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use atelier_cache::{cache_key, Cache, FileKv};
use atelier_commerce::cart::CartStore;
use atelier_commerce::catalog::{MemoryCatalog, ProductSnapshot};
use atelier_commerce::OrderServices;
use atelier_db::JsonFileDb;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Directory holding all local state.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.data_dir)
    }

    /// Open the persisted cart.
    pub fn cart(&self) -> Result<CartStore<FileKv>> {
        Ok(CartStore::with_key(
            self.kv()?,
            self.config.commerce.cart_namespace.clone(),
        ))
    }

    /// Load the local catalog.
    pub fn catalog(&self) -> Result<MemoryCatalog> {
        let products: Vec<ProductSnapshot> = Cache::new(self.kv()?)
            .get(&catalog_key())
            .context("Failed to read local catalog")?
            .unwrap_or_default();
        Ok(MemoryCatalog::from_products(products))
    }

    /// Persist the local catalog.
    pub fn save_catalog(&self, catalog: &MemoryCatalog) -> Result<()> {
        Cache::new(self.kv()?)
            .set(&catalog_key(), &catalog.list())
            .context("Failed to write local catalog")
    }

    /// Open the order store and build the services on it.
    pub async fn services(&self) -> Result<OrderServices> {
        let path = self.data_dir().join("orders.json");
        tracing::debug!(path = %path.display(), "opening order store");
        let db = JsonFileDb::open(&path)
            .await
            .with_context(|| format!("Failed to open order store at {}", path.display()))?;
        Ok(OrderServices::new(Arc::new(db), &self.config.commerce))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    fn kv(&self) -> Result<FileKv> {
        let dir = self.data_dir().join("kv");
        FileKv::open(&dir).with_context(|| format!("Failed to open {}", dir.display()))
    }
}

fn catalog_key() -> String {
    cache_key!("atelier", "catalog")
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<CliConfig> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some(config);
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
