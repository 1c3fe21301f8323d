//! Configuration types for the dataset pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DatasetError, Result};

/// Marker conventions of the source book.
///
/// Selects the part/chapter marker patterns and the "original" boilerplate
/// marker used by the structural extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookLayout {
    /// `* ЧАСТЬ ПЕРВАЯ *` / `Глава 1`
    #[default]
    Russian,
    /// `* PART ONE *` / `Chapter 1`
    English,
}

impl FromStr for BookLayout {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "russian" | "ru" => Ok(Self::Russian),
            "english" | "en" => Ok(Self::English),
            other => Err(DatasetError::invalid_config(format!(
                "unknown book layout: {}",
                other
            ))),
        }
    }
}

/// Language used for keyword stemming in the answer synthesizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemLanguage {
    #[default]
    Russian,
    English,
}

impl StemLanguage {
    pub fn algorithm(&self) -> rust_stemmers::Algorithm {
        match self {
            Self::Russian => rust_stemmers::Algorithm::Russian,
            Self::English => rust_stemmers::Algorithm::English,
        }
    }
}

impl FromStr for StemLanguage {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "russian" | "ru" => Ok(Self::Russian),
            "english" | "en" => Ok(Self::English),
            other => Err(DatasetError::invalid_config(format!(
                "unsupported stemmer language: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StemLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Russian => f.write_str("russian"),
            Self::English => f.write_str("english"),
        }
    }
}

/// How the source book is read and what counts as boilerplate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Legacy encoding label of the input file (WHATWG label).
    ///
    /// Default: `windows-1251`.
    pub encoding: String,

    /// Author name; also dropped from chapter text as boilerplate.
    pub author: String,

    /// Book title; also dropped from chapter text as boilerplate.
    pub title: String,

    pub layout: BookLayout,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            encoding: "windows-1251".to_string(),
            author: "Юрий Никитин".to_string(),
            title: "Трое из леса".to_string(),
            layout: BookLayout::Russian,
        }
    }
}

impl BookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_layout(mut self, layout: BookLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Word-window chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window size in words. Default: 500.
    pub chunk_size: usize,

    /// Words shared by consecutive windows. Must be below `chunk_size`.
    ///
    /// Default: 50.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Reject a zero window or an overlap that would stall the window.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DatasetError::invalid_config("chunk_size must be positive"));
        }
        if self.overlap >= self.chunk_size {
            return Err(DatasetError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Remote model parameters shared by question generation and refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model name, e.g. `yandexgpt-lite`.
    pub model: String,

    /// Sampling temperature. Default: 0.3.
    pub temperature: f32,

    /// Maximum output tokens. Default: 1024.
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "yandexgpt-lite".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Short-answer synthesis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Top-scoring sentences kept per answer. Default: 3.
    pub max_sentences: usize,

    pub language: StemLanguage,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_sentences: 3,
            language: StemLanguage::Russian,
        }
    }
}

impl AnswerConfig {
    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = max_sentences;
        self
    }

    pub fn with_language(mut self, language: StemLanguage) -> Self {
        self.language = language;
        self
    }
}
