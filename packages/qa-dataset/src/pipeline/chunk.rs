//! Word-window chunking of chapter text.
//!
//! Windows are counted in words, overlap by a fixed number of words, and are
//! trimmed to the span between the first and last period so that no chunk
//! begins or ends mid-sentence.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{BookConfig, Chunk, ChunkConfig, ChunkMetadata, Document};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Splits text into overlapping, sentence-trimmed word windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker. `overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkConfig::new(chunk_size, overlap).validate()?;
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn from_config(config: &ChunkConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Word-index ranges of the raw windows over `n_words` words.
    ///
    /// Once the remaining tail fits in one window it is emitted as the final
    /// window instead of being walked further.
    pub fn windows(&self, n_words: usize) -> Vec<Range<usize>> {
        if n_words <= self.chunk_size {
            return vec![0..n_words];
        }

        let mut windows = Vec::new();
        let mut start = 0;

        while start < n_words {
            windows.push(start..(start + self.chunk_size).min(n_words));
            start += self.step();

            if start < n_words && n_words - start <= self.chunk_size {
                windows.push(start..n_words);
                break;
            }
        }

        windows
    }

    /// Split text into trimmed chunks, dropping windows with no period.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();

        self.windows(words.len())
            .into_iter()
            .map(|range| trim_to_sentences(&words[range].join(" ")))
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }
}

/// Keep the text strictly after the first `.` through the last `.`.
///
/// Returns an empty string when the text has fewer than two periods' worth
/// of content (no period at all, or a single one).
pub fn trim_to_sentences(text: &str) -> String {
    let (Some(first), Some(last)) = (text.find('.'), text.rfind('.')) else {
        return String::new();
    };

    let kept = text[first + 1..=last].trim();
    match kept.strip_prefix(|c| c == '.' || c == ',') {
        Some(rest) => rest.trim_start().to_string(),
        None => kept.to_string(),
    }
}

/// Chunk every chapter of the document, tagging each chunk with provenance.
pub fn chunk_document(
    document: &Document,
    config: &ChunkConfig,
    book: &BookConfig,
) -> Result<Vec<Chunk>> {
    let chunker = Chunker::from_config(config)?;
    let mut chunks = Vec::new();

    for (part, chapter) in document.chapters() {
        let text = WHITESPACE.replace_all(&chapter.text, " ");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let pieces = chunker.split(text);
        debug!(
            part = %part.name,
            chapter = %chapter.name,
            chunks = pieces.len(),
            "Chunked chapter"
        );

        let metadata = ChunkMetadata {
            author: book.author.clone(),
            book_name: book.title.clone(),
            part_name: part.name.clone(),
            chapter_name: chapter.name.clone(),
        };
        chunks.extend(pieces.into_iter().map(|piece| Chunk::new(piece, metadata.clone())));
    }

    info!(chunks = chunks.len(), chunk_size = config.chunk_size, overlap = config.overlap, "Chunked document");
    Ok(chunks)
}

/// Chapter-length statistics used to tune the chunk size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub parts: usize,
    pub chapters: usize,
    pub total_words: usize,
    pub mean_words: f64,
    pub min_words: usize,
    pub max_words: usize,
    /// Upper median (`sorted[len / 2]`)
    pub median_words: usize,
}

pub fn analyze_document(document: &Document) -> DocumentStats {
    let mut lengths: Vec<usize> = document
        .chapters()
        .map(|(_, chapter)| chapter.text.split_whitespace().count())
        .collect();

    let mut stats = DocumentStats {
        parts: document.parts.len(),
        chapters: lengths.len(),
        ..Default::default()
    };

    if lengths.is_empty() {
        return stats;
    }

    lengths.sort_unstable();
    stats.total_words = lengths.iter().sum();
    stats.mean_words = stats.total_words as f64 / lengths.len() as f64;
    stats.min_words = lengths[0];
    stats.max_words = lengths[lengths.len() - 1];
    stats.median_words = lengths[lengths.len() / 2];
    stats
}

impl DocumentStats {
    pub fn log(&self) {
        info!(
            parts = self.parts,
            chapters = self.chapters,
            total_words = self.total_words,
            mean_words = format!("{:.0}", self.mean_words),
            min_words = self.min_words,
            max_words = self.max_words,
            median_words = self.median_words,
            "Chapter statistics"
        );
    }
}
