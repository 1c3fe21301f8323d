//! Results of turning a model reply into a question list.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::chunk::ChunkMetadata;
use super::prompt::{PromptRecord, PromptType};

/// Which extraction strategy produced the questions.
///
/// Downstream consumers must treat [`ParseStatus::NoExtraction`] and
/// [`ParseStatus::RequestFailed`] as "no usable data", not as a crash signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    #[serde(rename = "parsed_full_json")]
    ParsedFullJson,
    #[serde(rename = "parsed_json_key_result")]
    ParsedJsonKeyResult,
    #[serde(rename = "parsed_json_key_output")]
    ParsedJsonKeyOutput,
    #[serde(rename = "parsed_json_key_answers")]
    ParsedJsonKeyAnswers,
    #[serde(rename = "parsed_questions_array")]
    ParsedQuestionsArray,
    #[serde(rename = "parsed_questions_array_after_replace")]
    ParsedQuestionsArrayAfterReplace,
    #[serde(rename = "extracted_lines_ending_q")]
    ExtractedLinesEndingQ,
    #[serde(rename = "extracted_quoted_questions")]
    ExtractedQuotedQuestions,
    #[serde(rename = "no_extraction")]
    NoExtraction,
    /// Every attempt at the remote call failed; there was no text to parse
    #[serde(rename = "request_failed")]
    RequestFailed,
}

impl ParseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedFullJson => "parsed_full_json",
            Self::ParsedJsonKeyResult => "parsed_json_key_result",
            Self::ParsedJsonKeyOutput => "parsed_json_key_output",
            Self::ParsedJsonKeyAnswers => "parsed_json_key_answers",
            Self::ParsedQuestionsArray => "parsed_questions_array",
            Self::ParsedQuestionsArrayAfterReplace => "parsed_questions_array_after_replace",
            Self::ExtractedLinesEndingQ => "extracted_lines_ending_q",
            Self::ExtractedQuotedQuestions => "extracted_quoted_questions",
            Self::NoExtraction => "no_extraction",
            Self::RequestFailed => "request_failed",
        }
    }

    /// Status for a JSON object that carried the list under an alternate key.
    pub fn for_json_key(key: &str) -> Option<Self> {
        match key {
            "result" => Some(Self::ParsedJsonKeyResult),
            "output" => Some(Self::ParsedJsonKeyOutput),
            "answers" => Some(Self::ParsedJsonKeyAnswers),
            _ => None,
        }
    }

}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Questions recovered from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestions {
    pub questions: Vec<String>,
    pub status: ParseStatus,
}

impl ExtractedQuestions {
    pub fn new(questions: Vec<String>, status: ParseStatus) -> Self {
        Self { questions, status }
    }

    pub fn empty(status: ParseStatus) -> Self {
        Self::new(Vec::new(), status)
    }
}

/// Per-prompt outcome of question generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub prompt: String,

    #[serde(default)]
    pub questions: Vec<String>,

    #[serde(default)]
    pub source_chunk: String,

    #[serde(default)]
    pub metadata: ChunkMetadata,

    #[serde(default)]
    pub prompt_type: PromptType,

    /// Verbatim model output (empty when the call never succeeded)
    #[serde(default)]
    pub raw_output: String,

    pub parse_status: ParseStatus,

    /// Number of remote calls made for this prompt
    #[serde(default)]
    pub attempts: u32,

    /// Last remote error, present only when no output was obtained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Separately generated answers, aligned with `questions` by index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
}

impl ExtractionResult {
    /// Result for a prompt whose reply was parsed.
    pub fn parsed(
        record: &PromptRecord,
        raw_output: impl Into<String>,
        extracted: ExtractedQuestions,
        attempts: u32,
    ) -> Self {
        Self {
            prompt: record.prompt.clone(),
            questions: extracted.questions,
            source_chunk: record.source_chunk.clone(),
            metadata: record.metadata.clone(),
            prompt_type: record.prompt_type,
            raw_output: raw_output.into(),
            parse_status: extracted.status,
            attempts,
            error: None,
            answers: None,
        }
    }

    /// Result for a prompt whose remote call never succeeded.
    pub fn failed(record: &PromptRecord, error: impl Into<String>, attempts: u32) -> Self {
        Self {
            prompt: record.prompt.clone(),
            questions: Vec::new(),
            source_chunk: record.source_chunk.clone(),
            metadata: record.metadata.clone(),
            prompt_type: record.prompt_type,
            raw_output: String::new(),
            parse_status: ParseStatus::RequestFailed,
            attempts,
            error: Some(error.into()),
            answers: None,
        }
    }

    /// Whether this result yields any dataset records.
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}
