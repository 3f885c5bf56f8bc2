use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;

/// Server state - shared handles cloned into every handler.
///
/// The SQLite pool is the single shared resource; the ledger engine keeps
/// no other mutable state between requests, so workers for different
/// bookings never block each other.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
}

impl ServerState {
    /// Initialize the server state: ensure the working directory exists,
    /// open the database and run migrations.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
        })
    }
}
