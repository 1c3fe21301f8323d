//! Question-generation prompt records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::chunk::{Chunk, ChunkMetadata};

/// Style of questions a prompt asks for.
///
/// Declaration order is the order templates are selected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptType {
    /// Who/what/where/when questions answered verbatim by the excerpt
    #[serde(rename = "factual_questions")]
    Factual,

    /// Why/what-for questions about causes and motives
    #[serde(rename = "reasoning_questions")]
    Reasoning,

    /// How/which-exactly questions about details and links between events
    #[serde(rename = "detailed_understanding")]
    Detailed,
}

impl PromptType {
    /// All prompt types in template-declaration order.
    pub const ALL: [PromptType; 3] = [Self::Factual, Self::Reasoning, Self::Detailed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual_questions",
            Self::Reasoning => "reasoning_questions",
            Self::Detailed => "detailed_understanding",
        }
    }
}

impl Default for PromptType {
    fn default() -> Self {
        Self::Factual
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered prompt for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Fully rendered instruction text
    pub prompt: String,

    pub metadata: ChunkMetadata,

    pub prompt_type: PromptType,

    /// Chunk text the prompt was built from
    pub source_chunk: String,

    /// Output format the prompt asks the model for
    #[serde(default = "default_expected_format")]
    pub expected_format: String,
}

fn default_expected_format() -> String {
    "json".to_string()
}

impl PromptRecord {
    pub fn new(prompt: impl Into<String>, chunk: &Chunk, prompt_type: PromptType) -> Self {
        Self {
            prompt: prompt.into(),
            metadata: chunk.metadata.clone(),
            prompt_type,
            source_chunk: chunk.text.clone(),
            expected_format: default_expected_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_type_names_match_serde() {
        for prompt_type in PromptType::ALL {
            let json = serde_json::to_value(prompt_type).unwrap();
            assert_eq!(json, prompt_type.as_str());
        }
    }

    #[test]
    fn test_expected_format_defaults_when_missing() {
        let json = r#"{
            "prompt": "p",
            "metadata": {"author": "a", "book_name": "b", "part_name": "c", "chapter_name": "d"},
            "prompt_type": "reasoning_questions",
            "source_chunk": "s"
        }"#;

        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.prompt_type, PromptType::Reasoning);
        assert_eq!(record.expected_format, "json");
    }
}
