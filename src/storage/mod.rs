//! Key-value persistence for collection snapshots.
//!
//! Each logical collection is stored under one key as a full JSON value.
//! There is no transactionality across keys.

mod file;
mod memory;
mod postgres;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    fn backend_name(&self) -> &'static str;
}
