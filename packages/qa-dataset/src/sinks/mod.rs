//! [`RecordSink`](crate::traits::sink::RecordSink) implementations.

use std::path::Path;

use crate::error::{DatasetError, Result};

pub mod json_array;
pub mod jsonl;
pub mod memory;

pub use json_array::JsonArraySink;
pub use jsonl::JsonlSink;
pub use memory::MemorySink;

/// Create the directory that will hold `path`, if any.
pub(crate) async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DatasetError::write_io(parent, e)),
        None => Ok(()),
    }
}
