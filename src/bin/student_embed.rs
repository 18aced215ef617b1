use std::path::PathBuf;

use clap::Parser;

use corpus_embed::embeddings::download;
use corpus_embed::embeddings::engine::EmbeddingEngine;
use corpus_embed::{config, loader, logging, persist, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "student_embed",
    about = "Embed student rows into a RAG-ready JSON collection"
)]
struct Cli {
    /// Tabular student dataset (CSV with a header row)
    #[arg(long, env = "STUDENT_DATASET", default_value = config::paths::STUDENT_DATASET)]
    input: PathBuf,

    /// Output JSON collection
    #[arg(long, env = "STUDENT_OUTPUT", default_value = config::paths::STUDENT_OUTPUT)]
    output: PathBuf,

    /// Directory holding model.safetensors, tokenizer.json and config.json;
    /// downloaded on first use when not given
    #[arg(long, env = "EMBED_MODEL_DIR")]
    model_dir: Option<PathBuf>,
}

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy; the log file carries the same detail.
        eprintln!("[student_embed] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging()?;

    // Input is validated before the model loads: a bad export should fail in
    // milliseconds, not after pulling 1.3 GB of weights.
    let records = loader::load_students(&cli.input)?;
    log::info!(
        "Loaded {} student rows from {}",
        records.len(),
        cli.input.display()
    );

    let model_dir = match cli.model_dir {
        Some(dir) => dir,
        None => download::ensure_model_files()?,
    };
    let engine = EmbeddingEngine::load(&model_dir)?;

    log::info!("Generating embeddings...");
    let entries = pipeline::embed_students(&records, &engine)?;

    persist::write_collection(&cli.output, &entries)?;

    let dims = entries.first().map(|e| e.embedding.len()).unwrap_or(0);
    log::info!(
        "Done: {} entries ({} dims) saved to {}",
        entries.len(),
        dims,
        cli.output.display()
    );
    Ok(())
}
