use tracing::{debug, info};

use crate::config::Config;
use crate::db::sqlite::{self, AccountsStorage, SqlitePool};
use crate::error::BootstrapError;

/// Configuration and database bindings that every persistence step runs
/// inside. Obtain one with [`AppContext::open`] and release it with
/// [`AppContext::close`].
#[derive(Clone)]
pub struct AppContext {
    config: Config,
    pool: SqlitePool,
}

impl AppContext {
    pub async fn open(config: &Config) -> Result<Self, BootstrapError> {
        let pool = sqlite::connect(&config.database_url).await?;
        debug!(database_url = %config.database_url, "application context opened");
        Ok(Self {
            config: config.clone(),
            pool,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn accounts(&self) -> AccountsStorage {
        AccountsStorage::new(self.pool.clone())
    }

    /// Create every declared table and index that does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), BootstrapError> {
        sqlite::init_schema(&self.pool).await?;
        info!("database schema ensured");
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
