//! Question-answering dataset builder for a single source book
//!
//! Turns one HTML book into a JSON-Lines fine-tuning dataset of
//! `{request, response}` pairs:
//!
//! ```text
//! book.htm -> parts/chapters -> chunks -> prompts -> (model) -> questions -> dataset.jsonl
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use qa_dataset::{pipeline::*, sinks::JsonArraySink, testing::MockCompleter};
//!
//! let document = read_book("book.htm", &BookConfig::default())?;
//! let chunks = chunk_document(&document, &ChunkConfig::default(), &BookConfig::default())?;
//! let prompts = build_all_prompts(&chunks, 3);
//!
//! let sink = Arc::new(JsonArraySink::create("results.json").await?);
//! generate_questions(prompts, Arc::new(MockCompleter::new()), sink, generation, dispatch).await;
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - Deterministic stages (parse, chunk, prompts, question extraction, answers)
//! - [`dispatch`] - Retry policy and worker pool around remote calls
//! - [`traits`] - `Completer` and `RecordSink` seams
//! - [`sinks`] - JSONL, JSON-array and in-memory sinks
//! - [`artifacts`] - Reading and writing intermediate files
//! - [`testing`] - Mock completer for tests

pub mod artifacts;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "yandex")]
pub mod ai;

// Re-export core types at crate root
pub use error::{DatasetError, Result};
pub use traits::{
    completer::{CompletionRequest, Completer},
    sink::RecordSink,
};
pub use types::{
    AnswerConfig, BookConfig, BookLayout, ChatMessage, Chapter, Chunk, ChunkConfig,
    ChunkMetadata, DatasetRecord, Document, ExtractedQuestions, ExtractionResult,
    GenerationConfig, ParseStatus, Part, PromptRecord, PromptType, StemLanguage,
};

pub use dispatch::{
    generate_questions, process_prompt, refine_answers, refine_record, DispatchConfig,
    PoolReport, RetryOutcome, RetryPolicy, WorkerPool,
};
pub use pipeline::{
    analyze_document, build_all_prompts, build_dataset, build_prompts, chunk_document,
    extract_book, extract_questions, read_book, AnswerSynthesizer, Chunker, DocumentStats,
};
pub use sinks::{JsonArraySink, JsonlSink, MemorySink};
