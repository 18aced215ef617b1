// embeddings/ — Local sentence embedding via candle (pure Rust).
//
// Provides:
// - Model download with digest logging
// - BERT inference with CLS pooling + L2 normalization
// - The `Embedder` seam the pipelines are written against

pub mod download;
pub mod engine;

/// Encoder seam. Pipelines take an injected implementation instead of a
/// process-wide model instance, so tests run without model files.
pub trait Embedder {
    /// Embed a single text into a fixed-dimension, unit-norm vector.
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Embed a batch, one vector per input, preserving order 1:1.
    ///
    /// `batch_size` only controls progress-report granularity; results are
    /// identical to sequential `embed` calls. Any single failure aborts the
    /// whole batch.
    fn embed_batch(&self, texts: &[String], batch_size: usize) -> anyhow::Result<Vec<Vec<f32>>> {
        let batch_size = batch_size.max(1);
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            for text in batch {
                vectors.push(self.embed(text)?);
            }
            log::info!("Embedded {}/{} texts", vectors.len(), texts.len());
        }
        Ok(vectors)
    }
}
