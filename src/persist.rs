// persist.rs — JSON collection output.
//
// Collections are written pretty-printed so output files stay human-diffable.
// The write fully overwrites the destination. No atomic-rename step: this is a
// one-shot batch job with no concurrent readers, and a failed run is re-run
// from scratch.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

/// Serialize one collection to `path` as a pretty-printed JSON array.
pub fn write_collection<T: Serialize>(path: &Path, entries: &[T]) -> PipelineResult<()> {
    let file = File::create(path).map_err(|e| PipelineError::persist(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)
        .map_err(|e| PipelineError::persist(path, e))?;
    writer.flush().map_err(|e| PipelineError::persist(path, e))?;
    log::info!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_write_collection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let entries = vec![
            serde_json::json!({"id": "chunk_1", "embedding": [0.0, 1.0]}),
            serde_json::json!({"id": "chunk_2", "embedding": [1.0, 0.0]}),
        ];
        write_collection(&path, &entries).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        // Pretty-printed: one field per line
        assert!(raw.contains("\n"));
        let parsed: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_write_collection_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "x".repeat(10_000)).unwrap();

        let entries: Vec<Value> = vec![serde_json::json!({"id": "only"})];
        write_collection(&path, &entries).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_write_collection_unwritable_destination() {
        let err = write_collection(Path::new("no_such_dir/out.json"), &[Value::Null]).unwrap_err();
        assert!(matches!(err, PipelineError::Persist { .. }));
    }
}
