//! Indented JSON array rewritten atomically on every append.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ensure_parent_dir;
use crate::error::{DatasetError, Result};
use crate::traits::sink::RecordSink;

/// Keeps the output file a complete, human-readable JSON array after every
/// append.
///
/// The array is written to a sibling temp file and renamed over the target,
/// so a reader never sees a half-written array.
pub struct JsonArraySink<R> {
    path: PathBuf,
    records: Mutex<Vec<Value>>,
    _record: PhantomData<fn(&R)>,
}

impl<R> JsonArraySink<R> {
    /// Start an empty array at `path`, replacing any existing file.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;
        let sink = Self::with_records(path, Vec::new());
        sink.persist(&[]).await?;
        Ok(sink)
    }

    /// Continue an existing array at `path`.
    ///
    /// A missing file, or one that is not a JSON array, starts empty.
    pub async fn resume(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Array(items)) => items,
                _ => {
                    warn!(path = %path.display(), "Existing output is not a JSON array, starting over");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(DatasetError::write_io(&path, e)),
        };
        ensure_parent_dir(&path).await?;

        debug!(path = %path.display(), existing = records.len(), "Resuming JSON array sink");
        Ok(Self::with_records(path, records))
    }

    fn with_records(path: PathBuf, records: Vec<Value>) -> Self {
        Self {
            path,
            records: Mutex::new(records),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records committed so far.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn persist(&self, records: &[Value]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| DatasetError::write_io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DatasetError::write_io(&self.path, e))
    }
}

#[async_trait]
impl<R> RecordSink<R> for JsonArraySink<R>
where
    R: Serialize + Send + Sync,
{
    async fn append(&self, record: &R) -> Result<()> {
        let value = serde_json::to_value(record)?;

        let mut records = self.records.lock().await;
        records.push(value);
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }
        Ok(())
    }
}
