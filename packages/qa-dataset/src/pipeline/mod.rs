//! Pipeline stages, in the order they run.
//!
//! 1. [`parse`] - HTML book to part/chapter hierarchy
//! 2. [`chunk`] - chapter text to sentence-trimmed word windows
//! 3. [`prompts`] - chunks to question-generation prompts
//! 4. [`questions`] - model replies to question lists
//! 5. [`answers`] / [`dataset`] - questions to short-answer records
//! 6. [`refine`] - optional model-written answers for finished records
//!
//! Remote calls for stages 4 and 6 are driven by [`crate::dispatch`].

pub mod answers;
pub mod chunk;
pub mod dataset;
pub mod parse;
pub mod prompts;
pub mod questions;
pub mod refine;

pub use answers::AnswerSynthesizer;
pub use chunk::{analyze_document, chunk_document, trim_to_sentences, Chunker, DocumentStats};
pub use dataset::build_dataset;
pub use parse::{assemble_document, extract_book, html_to_lines, log_structure, read_book};
pub use prompts::{build_all_prompts, build_prompts, render_template};
pub use questions::{
    extract_questions, from_full_json, from_question_lines, from_questions_array,
    from_quoted_strings, strip_code_fences,
};
pub use refine::{refined_record, refinement_context, refinement_messages};
