use std::path::PathBuf;

use clap::Parser;

use corpus_embed::embeddings::download;
use corpus_embed::embeddings::engine::EmbeddingEngine;
use corpus_embed::{config, loader, logging, persist, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "web_embed",
    about = "Embed scraped text chunks and media placeholders into two JSON collections"
)]
struct Cli {
    /// JSON array of pre-chunked page text
    #[arg(long, env = "WEB_CHUNKS_FILE", default_value = config::paths::CHUNKS_FILE)]
    chunks: PathBuf,

    /// JSON array of scraped media records
    #[arg(long, env = "WEB_MEDIA_FILE", default_value = config::paths::MEDIA_FILE)]
    media: PathBuf,

    /// Output collection for text chunks
    #[arg(long, env = "WEB_TEXT_OUTPUT", default_value = config::paths::TEXT_OUTPUT)]
    text_output: PathBuf,

    /// Output collection for media placeholders
    #[arg(long, env = "WEB_MEDIA_OUTPUT", default_value = config::paths::MEDIA_OUTPUT)]
    media_output: PathBuf,

    /// Directory holding model.safetensors, tokenizer.json and config.json;
    /// downloaded on first use when not given
    #[arg(long, env = "EMBED_MODEL_DIR")]
    model_dir: Option<PathBuf>,
}

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy; the log file carries the same detail.
        eprintln!("[web_embed] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging()?;

    // Both inputs are validated before the model loads: a bad scrape should
    // fail in milliseconds, not after pulling 1.3 GB of weights.
    let chunks = loader::load_chunks(&cli.chunks)?;
    log::info!("Loaded {} text chunks from {}", chunks.len(), cli.chunks.display());
    let media = loader::load_media(&cli.media)?;
    log::info!("Loaded {} media records from {}", media.len(), cli.media.display());

    let model_dir = match cli.model_dir {
        Some(dir) => dir,
        None => download::ensure_model_files()?,
    };
    let engine = EmbeddingEngine::load(&model_dir)?;

    log::info!("Embedding {} text chunks...", chunks.len());
    let chunk_out = pipeline::embed_chunks(&chunks, &engine)?;
    persist::write_collection(&cli.text_output, &chunk_out.entries)?;
    log::info!(
        "Text collection saved: {} embedded, {} skipped",
        chunk_out.entries.len(),
        chunk_out.skipped
    );

    log::info!("Embedding {} media records (via generated text)...", media.len());
    let media_out = pipeline::embed_media(&media, &engine)?;
    persist::write_collection(&cli.media_output, &media_out.entries)?;
    log::info!(
        "Media collection saved: {} embedded, {} skipped",
        media_out.entries.len(),
        media_out.skipped
    );

    if let Some(entry) = chunk_out.entries.first() {
        log::info!("Text embedding dimension: {}", entry.embedding.len());
    }
    if let Some(entry) = media_out.entries.first() {
        log::info!("Media embedding dimension: {}", entry.embedding.len());
    }

    Ok(())
}
