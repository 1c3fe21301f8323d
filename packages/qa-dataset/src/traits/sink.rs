//! Append-only record output.

use async_trait::async_trait;

use crate::error::Result;

/// Destination for records produced by concurrent workers.
///
/// Implementations serialize concurrent `append` calls internally so that a
/// record is either fully committed or not written at all.
#[async_trait]
pub trait RecordSink<R>: Send + Sync
where
    R: Send + Sync,
{
    async fn append(&self, record: &R) -> Result<()>;
}
