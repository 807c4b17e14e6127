//! docqa - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use docqa::{
    cli::{Args, Commands, Config},
    logging::init_logging,
    models::{CandleEmbedder, ModelFiles, T5Generator},
    rag::{RAGPipeline, SentenceChunker},
    repl::{read_document, DisplayManager, ReplConfig, ReplSession},
};

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    init_logging(args.verbosity());

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_args(&args)?;

    match &args.command {
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Chunk { document }) => run_chunk(document, &config, &args),
        None => run_session(&args, &config),
    }
}

/// Print the passages a document splits into
fn run_chunk(path: &Path, config: &Config, args: &Args) -> Result<()> {
    let document = read_document(path)?;
    let chunker = SentenceChunker::new(config.chunking.target_words);
    let passages = chunker.chunk(&document);

    DisplayManager::new(args.verbosity()).show_passages(&passages);
    info!(passages = passages.len(), "Chunked document");
    Ok(())
}

/// Fetch and load both models, then wire them into a pipeline
fn build_pipeline(config: &Config, display: &DisplayManager) -> Result<RAGPipeline> {
    let models = &config.models;

    let pb = display.spinner(&format!("Loading embedding model {}...", models.embedding_model));
    let files = ModelFiles::fetch(&models.embedding_model, &models.embedding_revision)?;
    let embedder = CandleEmbedder::load(&files, models.pooling)
        .with_context(|| format!("Failed to load embedding model {}", models.embedding_model))?;
    display.finish(&pb, &format!("Embedding model {} ready", models.embedding_model));

    let pb = display.spinner(&format!("Loading generation model {}...", models.generation_model));
    let files = ModelFiles::fetch(&models.generation_model, &models.generation_revision)?;
    let generator = T5Generator::load(&files, config.generation_limits())
        .with_context(|| format!("Failed to load generation model {}", models.generation_model))?;
    display.finish(&pb, &format!("Generation model {} ready", models.generation_model));

    Ok(RAGPipeline::with_config(
        Arc::new(embedder),
        Arc::new(generator),
        config.to_rag_config(),
    ))
}

/// Answer `--ask` questions, or run the interactive loop
fn run_session(args: &Args, config: &Config) -> Result<()> {
    let display = DisplayManager::new(args.verbosity());

    if !args.is_one_shot() {
        display.show_banner(
            env!("CARGO_PKG_VERSION"),
            &config.models.embedding_model,
            &config.models.generation_model,
        );
    }

    let mut pipeline = build_pipeline(config, &display)?;

    if args.is_one_shot() {
        // validate() guarantees a document alongside --ask
        let path = args
            .document
            .as_deref()
            .context("--ask requires a DOCUMENT path")?;
        let document = read_document(path)?;
        pipeline
            .load(&document)
            .with_context(|| format!("Failed to process document {}", path.display()))?;

        for question in &args.ask {
            let result = pipeline.answer_with_details(question)?;
            display.show_answer(&result);
        }
        return Ok(());
    }

    let repl_config = ReplConfig::with_history(config.history_file());
    let mut session = ReplSession::new(pipeline, repl_config.input_handler()?, display);

    match &args.document {
        Some(path) => session.load_file(path)?,
        None => session.prompt_document()?,
    }

    session.run()
}
