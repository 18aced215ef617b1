//! Error types for the embedding pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds shared by both pipelines. Every variant is fatal for the run:
/// there is no retry and no partial-success output mode. Records excluded by a
/// validity rule are not errors and are only counted (see `pipeline`).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("record {index}: missing required field `{field}`")]
    FieldMissing { index: usize, field: &'static str },

    #[error("record {index}: field `{field}` has invalid value `{value}`")]
    FieldInvalid {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("failed to write {path}: {message}")]
    Persist { path: PathBuf, message: String },
}

impl PipelineError {
    pub fn load(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        PipelineError::Load {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn persist(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        PipelineError::Persist {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_missing_display() {
        let err = PipelineError::FieldMissing {
            index: 3,
            field: "cgpa",
        };
        assert!(err.to_string().contains("record 3"));
        assert!(err.to_string().contains("`cgpa`"));
    }

    #[test]
    fn test_load_display_includes_path() {
        let err = PipelineError::load(std::path::Path::new("chunks.json"), "no such file");
        assert!(err.to_string().contains("chunks.json"));
        assert!(err.to_string().contains("no such file"));
    }
}
