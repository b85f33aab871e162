use encore_core::config::Config;
use encore_core::dashboard::Dashboard;
use encore_core::demo::DemoSequencer;
use encore_core::identity::{IdentityService, MemoryIdentity};
use encore_core::store::{MemoryRowStore, RowStore};
use encore_core::timer::{ScaledTimer, TokioTimer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type Demo = DemoSequencer<ScaledTimer<TokioTimer>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<dyn RowStore>,
    pub identity: Arc<dyn IdentityService>,
    pub dashboard: Arc<Dashboard>,
    pub demo: Demo,
}

impl AppState {
    /// Load `encore.yaml` under `root` and the seed it names, if any.
    pub fn load(root: &Path) -> encore_core::Result<Self> {
        let config = Config::load(root)?;
        let store = match config.seed_path(root) {
            Some(path) => MemoryRowStore::load_seed(&path)?,
            None => MemoryRowStore::new(),
        };
        Ok(Self::new(root.to_path_buf(), config, Arc::new(store)))
    }

    pub fn new(root: PathBuf, config: Config, store: Arc<dyn RowStore>) -> Self {
        let identity: Arc<dyn IdentityService> = Arc::new(MemoryIdentity::new(store.clone()));
        let demo = DemoSequencer::storyteller_scaled(config.demo.speed);
        Self {
            root,
            config: Arc::new(config),
            dashboard: Arc::new(Dashboard::new(store.clone())),
            store,
            identity,
            demo,
        }
    }
}
