// pipeline.rs — Collection assembly for the three output collections.
//
// Pairs synthesized texts with their vectors and the metadata subset each
// collection persists. Entry order mirrors acceptance order; records excluded
// by a validity rule are counted, never reordered or recovered.

use serde::Serialize;
use serde_json::Value;

use crate::config;
use crate::embeddings::Embedder;
use crate::error::{PipelineError, PipelineResult};
use crate::loader::{ChunkRecord, MediaRecord, StudentRecord};
use crate::synthesize;

/// Persisted entry of the student collection: the full sentence, its vector,
/// and a metadata subset used for filtering at retrieval time.
#[derive(Debug, Clone, Serialize)]
pub struct StudentEntry {
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: StudentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentMetadata {
    pub roll_no: String,
    pub branch: String,
    pub cgpa: f64,
}

/// Persisted entry of the web collections. The embedded text itself is dropped
/// once encoded; retrieval needs only the id, the source page and the vector.
#[derive(Debug, Clone, Serialize)]
pub struct WebEntry {
    pub id: String,
    pub page_url: Option<String>,
    pub embedding: Vec<f32>,
}

/// Accepted entries of one web collection plus how many source records the
/// validity rules excluded.
#[derive(Debug)]
pub struct WebOutcome {
    pub entries: Vec<WebEntry>,
    pub skipped: usize,
}

/// Build the student collection: synthesize every sentence, embed them as one
/// batched call, pair results positionally. Any missing or invalid field in
/// any row fails the whole run.
pub fn embed_students(
    records: &[StudentRecord],
    embedder: &dyn Embedder,
) -> PipelineResult<Vec<StudentEntry>> {
    let sentences = records
        .iter()
        .map(synthesize::student_sentence)
        .collect::<PipelineResult<Vec<_>>>()?;
    // Metadata is validated up front so a bad row fails before any encoding work.
    let metadata = records
        .iter()
        .map(student_metadata)
        .collect::<PipelineResult<Vec<_>>>()?;

    let vectors = embedder
        .embed_batch(&sentences, config::embedding::BATCH_SIZE)
        .map_err(|e| PipelineError::Encoding(format!("{e:#}")))?;

    let entries = sentences
        .into_iter()
        .zip(vectors)
        .zip(metadata)
        .map(|((text, embedding), metadata)| StudentEntry {
            text,
            embedding,
            metadata,
        })
        .collect();
    Ok(entries)
}

fn student_metadata(record: &StudentRecord) -> PipelineResult<StudentMetadata> {
    let roll_no = record.require("roll_no")?.to_string();
    let branch = record.require("branch")?.to_string();
    let cgpa_raw = record.require("cgpa")?;
    let cgpa = cgpa_raw
        .trim()
        .parse::<f64>()
        .map_err(|_| PipelineError::FieldInvalid {
            index: record.index,
            field: "cgpa",
            value: cgpa_raw.to_string(),
        })?;
    Ok(StudentMetadata {
        roll_no,
        branch,
        cgpa,
    })
}

/// Build the text-chunk collection. Chunks failing the text validity rule or
/// lacking a chunk_id are skipped silently and counted.
pub fn embed_chunks(chunks: &[ChunkRecord], embedder: &dyn Embedder) -> PipelineResult<WebOutcome> {
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for chunk in chunks {
        let text = match chunk.text.as_ref().and_then(Value::as_str) {
            Some(t) if synthesize::chunk_text_is_valid(t) => t,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let Some(chunk_id) = render_chunk_id(chunk.metadata.chunk_id.as_ref()) else {
            log::warn!("text chunk has no chunk_id, skipped");
            skipped += 1;
            continue;
        };

        let embedding = embedder
            .embed(text)
            .map_err(|e| PipelineError::Encoding(format!("{e:#}")))?;

        entries.push(WebEntry {
            id: format!("chunk_{chunk_id}"),
            page_url: chunk.metadata.page_url.clone(),
            embedding,
        });
    }

    Ok(WebOutcome { entries, skipped })
}

/// Build the media collection from placeholder sentences. Items without a
/// source page are skipped silently; the id index counts accepted items only,
/// so skipped records leave no gap.
pub fn embed_media(media: &[MediaRecord], embedder: &dyn Embedder) -> PipelineResult<WebOutcome> {
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for item in media {
        let source_page = match item.source_page.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let text = synthesize::media_sentence(source_page);
        let embedding = embedder
            .embed(&text)
            .map_err(|e| PipelineError::Encoding(format!("{e:#}")))?;

        entries.push(WebEntry {
            id: format!("image_{}", entries.len()),
            page_url: Some(source_page.to_string()),
            embedding,
        });
    }

    Ok(WebOutcome { entries, skipped })
}

/// chunk_id appears as either a JSON string or a number in scraped metadata.
fn render_chunk_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Deterministic unit vectors without model files.
    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            let mut v = vec![0.0f32; 8];
            v[text.len() % 8] = 1.0;
            Ok(v)
        }
    }

    fn student(fields: &[(&str, &str)]) -> StudentRecord {
        let map: HashMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StudentRecord::new(0, map)
    }

    fn asha() -> StudentRecord {
        student(&[
            ("name", "Asha"),
            ("gender", "female"),
            ("branch", "CSE"),
            ("roll_no", "101"),
            ("degree_name", "B.Tech"),
            ("joining_year", "2019"),
            ("passed_year", "2023"),
            ("credits", "160"),
            ("cgpa", "8.5"),
            ("admission", "merit"),
            ("company_placed", "Acme"),
        ])
    }

    fn chunk(text: Option<Value>, chunk_id: Option<Value>, page_url: Option<&str>) -> ChunkRecord {
        ChunkRecord {
            text,
            metadata: crate::loader::ChunkMetadata {
                chunk_id,
                page_url: page_url.map(|s| s.to_string()),
            },
        }
    }

    #[test]
    fn test_embed_students_end_to_end() {
        let entries = embed_students(&[asha()], &StubEmbedder).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.starts_with("Asha is a female student"));
        assert_eq!(
            entries[0].metadata,
            StudentMetadata {
                roll_no: "101".to_string(),
                branch: "CSE".to_string(),
                cgpa: 8.5,
            }
        );
        let norm: f32 = entries[0].embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_embed_students_invalid_cgpa() {
        let record = student(&[
            ("name", "Asha"),
            ("gender", "female"),
            ("branch", "CSE"),
            ("roll_no", "101"),
            ("degree_name", "B.Tech"),
            ("joining_year", "2019"),
            ("passed_year", "2023"),
            ("credits", "160"),
            ("cgpa", "eight point five"),
            ("admission", "merit"),
            ("company_placed", "Acme"),
        ]);
        let err = embed_students(&[record], &StubEmbedder).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FieldInvalid { field: "cgpa", .. }
        ));
    }

    #[test]
    fn test_embed_chunks_id_and_page_url() {
        let chunks = vec![chunk(
            Some(Value::from("A".repeat(41))),
            Some(Value::from("7")),
            Some("http://x"),
        )];
        let out = embed_chunks(&chunks, &StubEmbedder).unwrap();
        assert_eq!(out.skipped, 0);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].id, "chunk_7");
        assert_eq!(out.entries[0].page_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_embed_chunks_numeric_id() {
        let chunks = vec![chunk(
            Some(Value::from("B".repeat(50))),
            Some(Value::from(12)),
            None,
        )];
        let out = embed_chunks(&chunks, &StubEmbedder).unwrap();
        assert_eq!(out.entries[0].id, "chunk_12");
        assert_eq!(out.entries[0].page_url, None);
    }

    #[test]
    fn test_embed_chunks_skips_invalid_text() {
        let chunks = vec![
            chunk(Some(Value::from("")), Some(Value::from(1)), None),
            chunk(Some(Value::from("  ")), Some(Value::from(2)), None),
            chunk(Some(Value::from(40)), Some(Value::from(3)), None),
            chunk(None, Some(Value::from(4)), None),
            chunk(Some(Value::from("C".repeat(41))), Some(Value::from(5)), None),
        ];
        let out = embed_chunks(&chunks, &StubEmbedder).unwrap();
        assert_eq!(out.skipped, 4);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].id, "chunk_5");
    }

    #[test]
    fn test_embed_media_skips_missing_source_page() {
        let media = vec![
            MediaRecord { source_page: None },
            MediaRecord {
                source_page: Some("".to_string()),
            },
            MediaRecord {
                source_page: Some("http://a".to_string()),
            },
        ];
        let out = embed_media(&media, &StubEmbedder).unwrap();
        assert_eq!(out.skipped, 2);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].id, "image_0");
        assert_eq!(out.entries[0].page_url.as_deref(), Some("http://a"));
    }

    #[test]
    fn test_media_ids_count_accepted_items_only() {
        let media = vec![
            MediaRecord {
                source_page: Some("http://a".to_string()),
            },
            MediaRecord { source_page: None },
            MediaRecord {
                source_page: Some("http://b".to_string()),
            },
        ];
        let out = embed_media(&media, &StubEmbedder).unwrap();
        let ids: Vec<&str> = out.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["image_0", "image_1"]);
    }

    #[test]
    fn test_chunk_and_media_counters_are_independent() {
        // Chunk skips must not shift subsequent media identifiers.
        let chunks = vec![
            chunk(Some(Value::from("short")), Some(Value::from(1)), None),
            chunk(Some(Value::from("D".repeat(41))), Some(Value::from(2)), None),
        ];
        let chunk_out = embed_chunks(&chunks, &StubEmbedder).unwrap();
        assert_eq!(chunk_out.skipped, 1);

        let media = vec![MediaRecord {
            source_page: Some("http://a".to_string()),
        }];
        let media_out = embed_media(&media, &StubEmbedder).unwrap();
        assert_eq!(media_out.entries[0].id, "image_0");
    }
}
