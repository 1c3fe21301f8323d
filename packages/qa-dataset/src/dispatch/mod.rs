//! Driving remote model calls over many units of work.
//!
//! Each unit (one prompt, or one dataset record) gets its own retried call
//! and its result is appended to a shared [`RecordSink`]. A unit whose calls
//! all fail is still recorded, with its error inline, so a run always
//! produces one output record per input unit.

pub mod pool;
pub mod retry;

use std::sync::Arc;

use tracing::debug;

pub use pool::{PoolReport, WorkerPool};
pub use retry::{RetryOutcome, RetryPolicy};

use crate::error::DatasetError;
use crate::pipeline::prompts::QUESTION_SYSTEM_PROMPT;
use crate::pipeline::{extract_questions, refined_record, refinement_messages};
use crate::traits::completer::{CompletionRequest, Completer};
use crate::traits::sink::RecordSink;
use crate::types::{ChatMessage, DatasetRecord, ExtractionResult, GenerationConfig, PromptRecord};

/// Concurrency and retry settings for a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Units in flight at once. Default: 8.
    pub workers: usize,

    pub retry: RetryPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            retry: RetryPolicy::default(),
        }
    }
}

impl DispatchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn request_for(generation: &GenerationConfig, messages: Vec<ChatMessage>) -> CompletionRequest {
    let mut request = CompletionRequest::new(&generation.model)
        .with_temperature(generation.temperature)
        .with_max_tokens(generation.max_tokens);
    request.messages = messages;
    request
}

/// Generate and parse questions for one prompt.
///
/// Never fails: exhausted retries, or an error the provider marks as
/// permanent, yield a `request_failed` result carrying the last error.
pub async fn process_prompt<C>(
    record: &PromptRecord,
    completer: &C,
    generation: &GenerationConfig,
    retry: &RetryPolicy,
) -> ExtractionResult
where
    C: Completer + ?Sized,
{
    let request = request_for(
        generation,
        vec![
            ChatMessage::system(QUESTION_SYSTEM_PROMPT),
            ChatMessage::user(record.prompt.clone()),
        ],
    );

    let outcome = retry
        .run_if(|_| completer.complete(&request), DatasetError::is_retryable)
        .await;

    match outcome.result {
        Ok(raw) => {
            let extracted = extract_questions(&raw);
            debug!(
                prompt_type = %record.prompt_type,
                status = %extracted.status,
                questions = extracted.questions.len(),
                attempts = outcome.attempts,
                "Parsed model reply"
            );
            ExtractionResult::parsed(record, raw, extracted, outcome.attempts)
        }
        Err(e) => ExtractionResult::failed(record, e.to_string(), outcome.attempts),
    }
}

/// Run question generation for every prompt through the worker pool.
pub async fn generate_questions<C, S>(
    prompts: Vec<PromptRecord>,
    completer: Arc<C>,
    sink: Arc<S>,
    generation: GenerationConfig,
    config: DispatchConfig,
) -> PoolReport
where
    C: Completer + ?Sized + 'static,
    S: RecordSink<ExtractionResult> + ?Sized + 'static,
{
    let generation = Arc::new(generation);
    let retry = config.retry;

    WorkerPool::new(config.workers)
        .run(prompts, move |record| {
            let completer = completer.clone();
            let sink = sink.clone();
            let generation = generation.clone();
            async move {
                let result = process_prompt(&record, completer.as_ref(), &generation, &retry).await;
                sink.append(&result).await
            }
        })
        .await
}

/// Ask the model to answer one record's question from its own context.
///
/// Falls back to the original response when the call is exhausted or the
/// reply is empty.
pub async fn refine_record<C>(
    record: &DatasetRecord,
    completer: &C,
    generation: &GenerationConfig,
    retry: &RetryPolicy,
) -> DatasetRecord
where
    C: Completer + ?Sized,
{
    let request = request_for(generation, refinement_messages(record));
    let outcome = retry
        .run_if(|_| completer.complete(&request), DatasetError::is_retryable)
        .await;

    refined_record(record, outcome.result.as_deref().ok())
}

/// Run answer refinement for every record through the worker pool.
pub async fn refine_answers<C, S>(
    records: Vec<DatasetRecord>,
    completer: Arc<C>,
    sink: Arc<S>,
    generation: GenerationConfig,
    config: DispatchConfig,
) -> PoolReport
where
    C: Completer + ?Sized + 'static,
    S: RecordSink<DatasetRecord> + ?Sized + 'static,
{
    let generation = Arc::new(generation);
    let retry = config.retry;

    WorkerPool::new(config.workers)
        .run(records, move |record| {
            let completer = completer.clone();
            let sink = sink.clone();
            let generation = generation.clone();
            async move {
                let refined = refine_record(&record, completer.as_ref(), &generation, &retry).await;
                sink.append(&refined).await
            }
        })
        .await
}
