//! Library entry points for the corpus-embed batch pipelines.
//!
//! Two binaries share these modules: `student_embed` (tabular rows → sentence
//! embeddings) and `web_embed` (scraped chunks and media → two collections).

pub mod config;
pub mod embeddings;
pub mod error;
pub mod loader;
pub mod logging;
pub mod persist;
pub mod pipeline;
pub mod synthesize;

pub use embeddings::Embedder;
pub use error::{PipelineError, PipelineResult};
pub use loader::{ChunkRecord, MediaRecord, StudentRecord};
pub use pipeline::{StudentEntry, WebEntry, WebOutcome};
