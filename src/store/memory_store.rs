use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RecordStore, StoreError};

/// In-process record store. Used for tests and dry runs.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.records.lock().await.clone())
    }

    async fn write_all(&self, records: &[T]) -> Result<(), StoreError> {
        *self.records.lock().await = records.to_vec();
        Ok(())
    }
}
