pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ClosedTrade, Trade};

pub const TRADES_FILE: &str = "trades.json";
pub const CLOSED_TRADES_FILE: &str = "closed-trades.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed records in {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An ordered collection of records, read and written as a whole.
///
/// `write_all` either replaces the complete collection or leaves the previous
/// complete state in place.
#[async_trait]
pub trait RecordStore<T: Send + Sync>: Send + Sync {
    async fn read_all(&self) -> Result<Vec<T>, StoreError>;
    async fn write_all(&self, records: &[T]) -> Result<(), StoreError>;
}

/// Open the open/closed ledger files under `data_dir`.
pub fn open_data_dir(data_dir: &Path) -> (JsonFileStore<Trade>, JsonFileStore<ClosedTrade>) {
    (
        JsonFileStore::new(data_dir.join(TRADES_FILE)),
        JsonFileStore::new(data_dir.join(CLOSED_TRADES_FILE)),
    )
}
