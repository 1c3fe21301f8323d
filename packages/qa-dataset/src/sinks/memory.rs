//! In-memory sink for tests and embedding.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{DatasetError, Result};
use crate::traits::sink::RecordSink;

/// Collects records in memory. Clones share the same buffer.
#[derive(Clone)]
pub struct MemorySink<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> Default for MemorySink<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<R: Clone> MemorySink<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records appended so far.
    pub fn records(&self) -> Vec<R> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<R> RecordSink<R> for MemorySink<R>
where
    R: Clone + Send + Sync,
{
    async fn append(&self, record: &R) -> Result<()> {
        self.records
            .write()
            .map_err(|_| DatasetError::Sink("memory sink lock poisoned".into()))?
            .push(record.clone());
        Ok(())
    }
}
