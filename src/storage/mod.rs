//! Record store module.
//!
//! This module provides two storage backends behind [`RecordStore`]:
//! - `SqliteStore`: a SQLite database file
//! - `MemoryStore`: an in-process table, lost on exit

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::*;

use crate::config::{Config, StorageBackendType};
use crate::error::Result;
use std::sync::Arc;

/// Create a storage backend from configuration.
pub async fn create_storage(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.storage.backend {
        StorageBackendType::Sqlite => {
            let storage =
                SqliteStore::open(config.database_path(), config.storage.max_connections).await?;
            Ok(Arc::new(storage))
        }
        StorageBackendType::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
