// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

// NOTE: PIPELINE_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const PIPELINE_VERSION: &str = "0.3.0";

pub mod logging {
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "corpus_embed";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod embedding {
    pub const EMBEDDING_DIMS: usize = 1024;
    pub const EMBEDDING_MODEL_NAME: &str = "bge-large-en-v1.5";

    // Max word-piece tokens for bge-large-en-v1.5 (model context limit is 512).
    // We pre-truncate to control what gets embedded.
    pub const MAX_TOKENS: usize = 512;

    // Texts per progress group in batch encoding. A throughput/reporting knob
    // only: results are identical to sequential single calls.
    pub const BATCH_SIZE: usize = 32;

    // Model download URL base (lazy download on first use).
    pub const MODEL_HUB_BASE: &str =
        "https://huggingface.co/BAAI/bge-large-en-v1.5/resolve/main";

    // Local model storage directory (relative to home)
    pub const MODEL_DIR_REL: &str = ".corpus-embed/models/bge-large-en-v1.5";

    // model.safetensors is ~1.3 GB; allow a slow pipe to finish.
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 1800;
}

pub mod validity {
    // A text chunk is embedded only when its trimmed length is strictly
    // greater than this many characters.
    pub const MIN_CHUNK_TEXT_CHARS: usize = 40;
}

pub mod paths {
    pub const STUDENT_DATASET: &str = "Student_Dataset.csv";
    pub const STUDENT_OUTPUT: &str = "student_row_wise_embeddings.json";

    pub const CHUNKS_FILE: &str = "chunks.json";
    pub const MEDIA_FILE: &str = "media.json";
    pub const TEXT_OUTPUT: &str = "chunks_embeddings.json";
    pub const MEDIA_OUTPUT: &str = "media_embeddings.json";
}
