//! Data types flowing between pipeline stages.

pub mod book;
pub mod chunk;
pub mod config;
pub mod dataset;
pub mod extraction;
pub mod prompt;

pub use book::{Chapter, Document, Part};
pub use chunk::{Chunk, ChunkMetadata};
pub use config::{AnswerConfig, BookConfig, BookLayout, ChunkConfig, GenerationConfig, StemLanguage};
pub use dataset::{ChatMessage, DatasetRecord};
pub use extraction::{ExtractedQuestions, ExtractionResult, ParseStatus};
pub use prompt::{PromptRecord, PromptType};
