//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qa_dataset::{AnswerConfig, BookConfig, BookLayout, ChunkConfig, StemLanguage};

#[derive(Parser, Debug)]
#[command(name = "qa-dataset", version, about = "Build a question-answering fine-tuning dataset from a book")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the part/chapter structure of an HTML book
    Parse {
        #[arg(short, long, default_value = "input/book.htm")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/book.json")]
        output: PathBuf,
        #[command(flatten)]
        book: BookArgs,
    },

    /// Split chapters into overlapping sentence-trimmed chunks
    Chunk {
        #[arg(short, long, default_value = "output/book.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/chunks.json")]
        output: PathBuf,
        #[command(flatten)]
        book: BookArgs,
        #[command(flatten)]
        chunking: ChunkArgs,
    },

    /// Build question-generation prompts for every chunk
    Prompts {
        #[arg(short, long, default_value = "output/chunks.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/prompts.json")]
        output: PathBuf,
        /// Templates used per chunk (1-3)
        #[arg(long, default_value_t = 3)]
        prompts_per_chunk: usize,
    },

    /// Ask the model for questions on every prompt
    Questions {
        #[arg(short, long, default_value = "output/prompts.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/results.json")]
        output: PathBuf,
        /// Append to an existing results file instead of starting over
        #[arg(long)]
        resume: bool,
    },

    /// Turn extraction results into a JSONL dataset
    Dataset {
        #[arg(short, long, default_value = "output/results.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/dataset.jsonl")]
        output: PathBuf,
        #[command(flatten)]
        answers: AnswerArgs,
    },

    /// Rewrite dataset answers with the model, grounded in each record
    Answers {
        #[arg(short, long, default_value = "output/dataset.jsonl")]
        input: PathBuf,
        #[arg(short, long, default_value = "output/dataset_refined.jsonl")]
        output: PathBuf,
    },

    /// Run every stage from book to dataset
    Run {
        #[arg(short, long, default_value = "input/book.htm")]
        input: PathBuf,
        /// Directory for all intermediate and final artifacts
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        #[command(flatten)]
        book: BookArgs,
        #[command(flatten)]
        chunking: ChunkArgs,
        #[arg(long, default_value_t = 3)]
        prompts_per_chunk: usize,
        #[command(flatten)]
        answers: AnswerArgs,
        /// Also run answer refinement on the finished dataset
        #[arg(long)]
        refine: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Book author; lines containing it are dropped as boilerplate
    #[arg(long, default_value = "Юрий Никитин")]
    pub author: String,
    /// Book title; lines containing it are dropped as boilerplate
    #[arg(long, default_value = "Трое из леса")]
    pub title: String,
    /// Source file encoding label
    #[arg(long, default_value = "windows-1251")]
    pub encoding: String,
    /// Part/chapter marker conventions (russian, english)
    #[arg(long, default_value = "russian")]
    pub layout: BookLayout,
}

impl BookArgs {
    pub fn config(&self) -> BookConfig {
        BookConfig::new()
            .with_author(&self.author)
            .with_title(&self.title)
            .with_encoding(&self.encoding)
            .with_layout(self.layout)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ChunkArgs {
    /// Chunk size in words
    #[arg(long, default_value_t = 500)]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in words
    #[arg(long, default_value_t = 50)]
    pub overlap: usize,
}

impl ChunkArgs {
    pub fn config(&self) -> ChunkConfig {
        ChunkConfig::new(self.chunk_size, self.overlap)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct AnswerArgs {
    /// Sentences kept per synthesized answer
    #[arg(long, default_value_t = 3)]
    pub max_sentences: usize,
    /// Stemmer language (russian, english)
    #[arg(long, default_value = "russian")]
    pub language: StemLanguage,
}

impl AnswerArgs {
    pub fn config(&self) -> AnswerConfig {
        AnswerConfig::default()
            .with_max_sentences(self.max_sentences)
            .with_language(self.language)
    }
}
