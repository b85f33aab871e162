pub mod artists;
pub mod config;
pub mod demo;
pub mod genres;
pub mod metrics;
pub mod serve;
pub mod subscribers;

use anyhow::Context;
use encore_core::config::Config;
use encore_core::dashboard::{Dashboard, Loaded};
use encore_core::store::MemoryRowStore;
use std::path::Path;
use std::sync::Arc;

/// Config plus a dashboard over the configured seed (empty when unset).
pub(crate) fn open_dashboard(root: &Path) -> anyhow::Result<(Config, Dashboard)> {
    let config = Config::load(root).context("failed to load config")?;
    let store = match config.seed_path(root) {
        Some(path) => MemoryRowStore::load_seed(&path)
            .with_context(|| format!("failed to load seed {}", path.display()))?,
        None => MemoryRowStore::new(),
    };
    Ok((config, Dashboard::new(Arc::new(store))))
}

/// Unwrap a view for printing, failing when the fetch did not succeed.
pub(crate) fn loaded<T>(view: Loaded<T>) -> anyhow::Result<T> {
    match view.error {
        None => Ok(view.data),
        Some(e) => anyhow::bail!("{e}"),
    }
}
