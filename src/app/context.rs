use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::generator::{AskamaRenderer, Generator};
use crate::store::SqliteStore;
use crate::update::Updater;

/// Wires the store, the updater and the site generator from one [`Config`].
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub updater: Updater<SqliteStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;
        tracing::debug!("Opening database {}", db_path.display());
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.update)?);
        let updater = Updater::new(store.clone(), fetcher, &config.update);

        Ok(Self {
            config,
            store,
            updater,
        })
    }

    pub fn generator(&self, output_dir: PathBuf) -> Generator<AskamaRenderer> {
        Generator::new(
            self.config.site.clone(),
            self.config.generator.clone(),
            output_dir,
            AskamaRenderer,
        )
    }
}
