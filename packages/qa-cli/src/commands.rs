//! Stage implementations behind each subcommand

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use qa_dataset::ai::YandexGpt;
use qa_dataset::artifacts::{read_json, read_jsonl, write_json, write_jsonl};
use qa_dataset::{
    analyze_document, build_all_prompts, build_dataset, chunk_document, generate_questions,
    read_book, refine_answers, AnswerConfig, AnswerSynthesizer, BookConfig, Chunk, ChunkConfig,
    DatasetRecord, Document, ExtractionResult, JsonArraySink, JsonlSink, PoolReport,
    PromptRecord,
};

use crate::config::Config;

/// Artifact locations for a full run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub book: PathBuf,
    pub chunks: PathBuf,
    pub prompts: PathBuf,
    pub results: PathBuf,
    pub dataset: PathBuf,
    pub refined: PathBuf,
}

impl RunPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            book: dir.join("book.json"),
            chunks: dir.join("chunks.json"),
            prompts: dir.join("prompts.json"),
            results: dir.join("results.json"),
            dataset: dir.join("dataset.jsonl"),
            refined: dir.join("dataset_refined.jsonl"),
        }
    }
}

fn completer(config: &Config) -> Result<Arc<YandexGpt>> {
    let credentials = config.credentials()?;
    Ok(Arc::new(YandexGpt::new(
        credentials.api_key,
        credentials.folder_id,
    )))
}

pub fn parse(input: &Path, output: &Path, book: &BookConfig) -> Result<Document> {
    let document = read_book(input, book)
        .with_context(|| format!("Failed to parse book {}", input.display()))?;
    write_json(output, &document).context("Failed to write book structure")?;

    info!(
        parts = document.parts.len(),
        chapters = document.chapter_count(),
        output = %output.display(),
        "Saved book structure"
    );
    Ok(document)
}

pub fn chunk(
    document: &Document,
    output: &Path,
    chunking: &ChunkConfig,
    book: &BookConfig,
) -> Result<Vec<Chunk>> {
    analyze_document(document).log();

    let chunks = chunk_document(document, chunking, book).context("Failed to chunk book")?;
    write_json(output, &chunks).context("Failed to write chunks")?;

    info!(chunks = chunks.len(), output = %output.display(), "Saved chunks");
    Ok(chunks)
}

pub fn chunk_file(
    input: &Path,
    output: &Path,
    chunking: &ChunkConfig,
    book: &BookConfig,
) -> Result<Vec<Chunk>> {
    let document: Document = read_json(input)
        .with_context(|| format!("Failed to read book structure {}", input.display()))?;
    chunk(&document, output, chunking, book)
}

pub fn prompts(chunks: &[Chunk], output: &Path, prompts_per_chunk: usize) -> Result<Vec<PromptRecord>> {
    let prompts = build_all_prompts(chunks, prompts_per_chunk);
    write_json(output, &prompts).context("Failed to write prompts")?;

    info!(prompts = prompts.len(), output = %output.display(), "Saved prompts");
    Ok(prompts)
}

pub fn prompts_file(input: &Path, output: &Path, prompts_per_chunk: usize) -> Result<Vec<PromptRecord>> {
    let chunks: Vec<Chunk> = read_json(input)
        .with_context(|| format!("Failed to read chunks {}", input.display()))?;
    prompts(&chunks, output, prompts_per_chunk)
}

/// Drop prompts that already have a result in `results`.
fn pending_prompts(prompts: Vec<PromptRecord>, results: &Path) -> Result<Vec<PromptRecord>> {
    if !results.exists() {
        return Ok(prompts);
    }

    let done: Vec<ExtractionResult> = match read_json(results) {
        Ok(done) => done,
        Err(e) => {
            warn!(error = %e, "Existing results unreadable, processing every prompt");
            return Ok(prompts);
        }
    };
    let done: HashSet<String> = done.into_iter().map(|r| r.prompt).collect();

    let pending: Vec<PromptRecord> = prompts
        .into_iter()
        .filter(|p| !done.contains(&p.prompt))
        .collect();
    info!(done = done.len(), pending = pending.len(), "Resuming question generation");
    Ok(pending)
}

pub async fn questions(
    config: &Config,
    prompts: Vec<PromptRecord>,
    output: &Path,
    resume: bool,
) -> Result<PoolReport> {
    let completer = completer(config)?;

    let (prompts, sink) = if resume {
        let prompts = pending_prompts(prompts, output)?;
        (prompts, JsonArraySink::<ExtractionResult>::resume(output).await?)
    } else {
        (prompts, JsonArraySink::<ExtractionResult>::create(output).await?)
    };

    info!(prompts = prompts.len(), model = %config.model, "Generating questions");
    let report = generate_questions(
        prompts,
        completer,
        Arc::new(sink),
        config.generation(),
        config.dispatch(),
    )
    .await;

    info!(
        total = report.total,
        completed = report.completed,
        failed = report.failed,
        output = %output.display(),
        "Question generation finished"
    );
    Ok(report)
}

pub async fn questions_file(config: &Config, input: &Path, output: &Path, resume: bool) -> Result<PoolReport> {
    // fail on missing credentials before touching any input
    config.credentials()?;
    let prompts: Vec<PromptRecord> = read_json(input)
        .with_context(|| format!("Failed to read prompts {}", input.display()))?;
    questions(config, prompts, output, resume).await
}

pub fn dataset(input: &Path, output: &Path, answers: &AnswerConfig) -> Result<Vec<DatasetRecord>> {
    let results: Vec<ExtractionResult> = read_json(input)
        .with_context(|| format!("Failed to read results {}", input.display()))?;

    let synthesizer = AnswerSynthesizer::new(answers.language);
    let records = build_dataset(&results, &synthesizer, answers.max_sentences);
    write_jsonl(output, &records).context("Failed to write dataset")?;

    let with_questions = results.iter().filter(|r| r.has_questions()).count();
    info!(
        results = results.len(),
        with_questions,
        records = records.len(),
        output = %output.display(),
        "Saved dataset"
    );
    Ok(records)
}

pub async fn answers(config: &Config, input: &Path, output: &Path) -> Result<PoolReport> {
    let completer = completer(config)?;
    let records: Vec<DatasetRecord> = read_jsonl(input)
        .with_context(|| format!("Failed to read dataset {}", input.display()))?;

    let sink = JsonlSink::<DatasetRecord>::create(output)
        .await
        .context("Failed to create refined dataset")?;

    info!(records = records.len(), model = %config.model, "Refining answers");
    let report = refine_answers(
        records,
        completer,
        Arc::new(sink),
        config.generation(),
        config.dispatch(),
    )
    .await;

    info!(
        total = report.total,
        completed = report.completed,
        failed = report.failed,
        output = %output.display(),
        "Answer refinement finished"
    );
    Ok(report)
}

/// Options for a full book-to-dataset run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub book: BookConfig,
    pub chunking: ChunkConfig,
    pub prompts_per_chunk: usize,
    pub answers: AnswerConfig,
    pub refine: bool,
}

pub async fn run(config: &Config, input: &Path, output_dir: &Path, options: &RunOptions) -> Result<()> {
    config.credentials()?;
    options
        .chunking
        .validate()
        .context("Invalid chunking parameters")?;

    let paths = RunPaths::in_dir(output_dir);
    info!(input = %input.display(), output_dir = %output_dir.display(), "Starting dataset run");

    let document = parse(input, &paths.book, &options.book)?;
    let chunks = chunk(&document, &paths.chunks, &options.chunking, &options.book)?;
    let prompts = prompts(&chunks, &paths.prompts, options.prompts_per_chunk)?;

    questions(config, prompts, &paths.results, false).await?;
    dataset(&paths.results, &paths.dataset, &options.answers)?;

    if options.refine {
        answers(config, &paths.dataset, &paths.refined).await?;
    }

    info!("Dataset run complete");
    Ok(())
}
