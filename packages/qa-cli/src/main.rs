//! Dataset builder CLI
//!
//! Runs the book-to-dataset pipeline one stage at a time, or end to end
//! with `run`. Remote stages read `YANDEX_API_KEY` and `YANDEX_FOLDER_ID`
//! from the environment (or a `.env` file).

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use commands::RunOptions;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qa_dataset=debug,qa_cli=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Parse { input, output, book } => {
            commands::parse(&input, &output, &book.config())?;
        }
        Command::Chunk {
            input,
            output,
            book,
            chunking,
        } => {
            commands::chunk_file(&input, &output, &chunking.config(), &book.config())?;
        }
        Command::Prompts {
            input,
            output,
            prompts_per_chunk,
        } => {
            commands::prompts_file(&input, &output, prompts_per_chunk)?;
        }
        Command::Questions {
            input,
            output,
            resume,
        } => {
            commands::questions_file(&config, &input, &output, resume).await?;
        }
        Command::Dataset {
            input,
            output,
            answers,
        } => {
            commands::dataset(&input, &output, &answers.config())?;
        }
        Command::Answers { input, output } => {
            commands::answers(&config, &input, &output).await?;
        }
        Command::Run {
            input,
            output_dir,
            book,
            chunking,
            prompts_per_chunk,
            answers,
            refine,
        } => {
            let options = RunOptions {
                book: book.config(),
                chunking: chunking.config(),
                prompts_per_chunk,
                answers: answers.config(),
                refine,
            };
            commands::run(&config, &input, &output_dir, &options).await?;
        }
    }

    Ok(())
}
