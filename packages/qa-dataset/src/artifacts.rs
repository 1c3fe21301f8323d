//! Intermediate artifact files: pretty JSON documents and JSON-Lines.
//!
//! Every stage materializes its whole output before writing, so a failed
//! stage leaves no partial artifact behind.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DatasetError, Result};

/// Read a JSON document.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::from_io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a value as indented UTF-8 JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value)?;
    write_file(path, content)?;
    debug!(path = %path.display(), "Wrote JSON artifact");
    Ok(())
}

/// Read one JSON value per non-blank line.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::from_io(path, e))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                warn!(path = %path.display(), line = i + 1, "Malformed JSONL line");
                DatasetError::from(e)
            })
        })
        .collect()
}

/// Write records as JSON-Lines, one compact object per line.
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut content = String::new();
    for record in records {
        content.push_str(&serde_json::to_string(record)?);
        content.push('\n');
    }
    write_file(path, content)?;
    debug!(path = %path.display(), records = records.len(), "Wrote JSONL artifact");
    Ok(())
}

fn write_file(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::write_io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| DatasetError::write_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chapter, DatasetRecord, Document, Part};

    #[test]
    fn test_json_artifact_is_indented_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/book.json");
        let doc = Document::new(vec![
            Part::new("ЧАСТЬ ПЕРВАЯ").with_chapter(Chapter::new("Глава 1", "Текст."))
        ]);

        write_json(&path, &doc).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ЧАСТЬ ПЕРВАЯ"));
        assert!(content.contains("\n  "));

        let back: Document = read_json(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        std::fs::write(
            &path,
            "{\"request\":[{\"role\":\"user\",\"text\":\"Q?\"}],\"response\":\"A.\"}\n\n",
        )
        .unwrap();

        let records: Vec<DatasetRecord> = read_jsonl(&path).unwrap();
        assert_eq!(records, vec![DatasetRecord::new("Q?", "A.")]);
    }

    #[test]
    fn test_jsonl_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let records = vec![DatasetRecord::new("Q1?", "A1."), DatasetRecord::new("Q2?", "A2.")];

        write_jsonl(&path, &records).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
        assert_eq!(read_jsonl::<DatasetRecord>(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_artifact() {
        let err = read_json::<Document>("/no/such/chunks.json").unwrap_err();
        assert!(matches!(err, DatasetError::InputNotFound { .. }));
    }
}
