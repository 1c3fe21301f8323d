//! Turning extraction results into fine-tuning records.

use tracing::{debug, info};

use super::answers::AnswerSynthesizer;
use crate::types::{DatasetRecord, ExtractionResult};

/// One record per question, answered from the paired source text.
///
/// When a result carries separately generated `answers`, question `i` is
/// answered from `answers[i]` (surplus questions are skipped); otherwise every
/// question is answered from the result's `source_chunk`.
pub fn build_dataset(
    results: &[ExtractionResult],
    synthesizer: &AnswerSynthesizer,
    max_sentences: usize,
) -> Vec<DatasetRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in results {
        if !result.has_questions() {
            skipped += 1;
            continue;
        }

        let sources: Vec<&str> = match &result.answers {
            Some(answers) => answers.iter().map(String::as_str).collect(),
            None => vec![result.source_chunk.as_str(); result.questions.len()],
        };

        for (question, source) in result.questions.iter().zip(sources) {
            let response = synthesizer.synthesize(question, source, max_sentences);
            records.push(DatasetRecord::new(question.clone(), response));
        }
    }

    debug!(skipped, "Results without questions");
    info!(records = records.len(), results = results.len(), "Built dataset");
    records
}
