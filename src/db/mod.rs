use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductChanges, ProductDraft};

mod memory;
mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// `DATABASE_URL` prefix that selects the in-memory store.
pub const MEMORY_URL_PREFIX: &str = "memory:";

/// The only component that talks to the persistent store. One method per
/// CRUD verb; every mutation is durable once the future resolves.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, draft: ProductDraft) -> AppResult<Product>;

    /// All records in the store's natural (creation) order.
    async fn list_all(&self) -> AppResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: &ProductChanges) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Parse an identifier taken from a request path.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Build the process-wide store from configuration.
///
/// A failed initial connection is logged and replaced by a lazily connecting
/// pool so the server still comes up; requests fail with 500 until the
/// database is reachable.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn ProductStore>> {
    if config.database_url.starts_with(MEMORY_URL_PREFIX) {
        info!("Using in-memory product store.");
        return Ok(Arc::new(MemoryProductStore::new()));
    }

    let options = || PgPoolOptions::new().max_connections(config.max_connections);

    info!("Connecting to PostgreSQL...");
    let pool = match options().connect(&config.database_url).await {
        Ok(pool) => {
            info!("Database connection pool established.");
            info!("Running migrations...");
            match sqlx::migrate!("./migrations").run(&pool).await {
                Ok(()) => info!("Migrations complete."),
                Err(err) => error!(error = %err, "Migrations failed"),
            }
            pool
        }
        Err(err) => {
            error!(
                error = %err,
                "Could not connect to PostgreSQL; serving with a lazy pool"
            );
            options()
                .connect_lazy(&config.database_url)
                .context("DATABASE_URL is not a valid connection string")?
        }
    };

    Ok(Arc::new(PgProductStore::new(pool)))
}
