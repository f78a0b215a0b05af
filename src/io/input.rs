use std::path::Path;

use crate::error::{CodingError, Result};
use crate::models::{Chunk, ChunkRecord};

use super::columns;

/// Read a UTF-8 text file (transcripts, translations)
pub fn read_text_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Load a chunk table written by one of the `write_*` functions
///
/// Only `chunk_id` and `text` are required. Columns other than `embedding`
/// and `question_similarity` are ignored.
pub fn read_chunk_table(path: &Path) -> Result<Vec<ChunkRecord>> {
    let reader = csv::Reader::from_path(path)?;
    parse_chunk_table(reader)
}

/// Parse a chunk table from any reader
pub fn parse_chunk_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<ChunkRecord>> {
    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let id_col = position(columns::CHUNK_ID).ok_or_else(|| missing_column(columns::CHUNK_ID))?;
    let text_col = position(columns::TEXT).ok_or_else(|| missing_column(columns::TEXT))?;
    let embedding_col = position(columns::EMBEDDING);
    let similarity_col = position(columns::QUESTION_SIMILARITY);

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let chunk_id: usize = field(id_col).parse().map_err(|_| {
            CodingError::MalformedSource(format!(
                "row {}: invalid chunk_id {:?}",
                row + 1,
                field(id_col)
            ))
        })?;

        let embedding = match embedding_col.map(field) {
            Some(raw) if !raw.is_empty() => {
                Some(serde_json::from_str::<Vec<f32>>(raw).map_err(|e| {
                    CodingError::MalformedSource(format!(
                        "row {}: embedding is not a JSON array of numbers: {}",
                        row + 1,
                        e
                    ))
                })?)
            }
            _ => None,
        };

        let question_similarity = match similarity_col.map(field) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<f32>().map_err(|_| {
                CodingError::MalformedSource(format!(
                    "row {}: invalid question_similarity {:?}",
                    row + 1,
                    raw
                ))
            })?),
            _ => None,
        };

        records.push(ChunkRecord {
            chunk: Chunk {
                chunk_id,
                text: record.get(text_col).unwrap_or("").to_string(),
                embedding,
            },
            question_similarity,
        });
    }

    Ok(records)
}

fn missing_column(name: &str) -> CodingError {
    CodingError::MalformedSource(format!("chunk table has no '{}' column", name))
}
