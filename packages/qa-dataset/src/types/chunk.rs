//! Chunk of chapter text plus its provenance.

use serde::{Deserialize, Serialize};

/// Where a chunk came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub author: String,
    pub book_name: String,
    pub part_name: String,
    pub chapter_name: String,
}

impl ChunkMetadata {
    /// Single-line rendering used when the metadata is substituted into a prompt.
    pub fn render(&self) -> String {
        format!(
            "author: {}; book: {}; part: {}; chapter: {}",
            self.author, self.book_name, self.part_name, self.chapter_name
        )
    }
}

/// A sentence-trimmed excerpt of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
