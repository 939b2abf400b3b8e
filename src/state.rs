use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::api::InkwellApi;
use crate::auth::storage::{MemoryStorage, SqliteStorage};
use crate::auth::SessionStore;
use crate::config::Config;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn InkwellApi>,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire the session store over the SQLite pool (persistent area) and a fresh in-memory map
    /// (volatile area).
    pub fn new(config: Config, db: DbPool, api: Arc<dyn InkwellApi>) -> Self {
        let sessions = SessionStore::new(
            Arc::new(SqliteStorage::new(db)),
            Arc::new(MemoryStorage::with_idle_limit(config.auth.volatile_idle())),
        );
        Self {
            config,
            api,
            sessions,
        }
    }
}
