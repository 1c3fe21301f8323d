//! One JSON object per line, appended under a lock.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::ensure_parent_dir;
use crate::error::{DatasetError, Result};
use crate::traits::sink::RecordSink;

/// Appends each record as a single line of JSON.
///
/// A line is written and flushed while the lock is held, so concurrent
/// producers never interleave partial records.
pub struct JsonlSink<R> {
    path: PathBuf,
    file: Mutex<File>,
    _record: PhantomData<fn(&R)>,
}

impl<R> JsonlSink<R> {
    /// Start a fresh file at `path`, replacing any existing one.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;
        let file = File::create(&path)
            .await
            .map_err(|e| DatasetError::write_io(&path, e))?;

        debug!(path = %path.display(), "Created JSONL sink");
        Ok(Self {
            path,
            file: Mutex::new(file),
            _record: PhantomData,
        })
    }

    /// Append to `path`, creating it if missing.
    pub async fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DatasetError::write_io(&path, e))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<R> RecordSink<R> for JsonlSink<R>
where
    R: Serialize + Send + Sync,
{
    async fn append(&self, record: &R) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DatasetError::write_io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| DatasetError::write_io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatasetRecord;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_appends_are_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let sink = Arc::new(JsonlSink::<DatasetRecord>::create(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..20 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                let record = DatasetRecord::new(format!("Вопрос {}?", i), "x".repeat(500));
                sink.append(&record).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 20);
        for line in lines {
            let record: DatasetRecord = serde_json::from_str(line).unwrap();
            assert_eq!(record.response.len(), 500);
        }
    }

    #[tokio::test]
    async fn test_create_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        std::fs::write(&path, "stale\n").unwrap();

        let sink = JsonlSink::<DatasetRecord>::create(&path).await.unwrap();
        sink.append(&DatasetRecord::new("Q?", "A.")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh/out.jsonl");
        let appended = dir.path().join("other/nested/out.jsonl");

        let sink = JsonlSink::<DatasetRecord>::create(&fresh).await.unwrap();
        sink.append(&DatasetRecord::new("Q?", "A.")).await.unwrap();
        assert_eq!(std::fs::read_to_string(&fresh).unwrap().lines().count(), 1);

        let sink = JsonlSink::<DatasetRecord>::append_to(&appended).await.unwrap();
        sink.append(&DatasetRecord::new("Q?", "A.")).await.unwrap();
        assert!(appended.exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let err = JsonlSink::<DatasetRecord>::create(blocker.join("out.jsonl"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[tokio::test]
    async fn test_append_to_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        std::fs::write(&path, "{\"request\":[],\"response\":\"old\"}\n").unwrap();

        let sink = JsonlSink::<DatasetRecord>::append_to(&path).await.unwrap();
        sink.append(&DatasetRecord::new("Q?", "new")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
