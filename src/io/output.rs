use std::path::Path;

use crate::error::Result;
use crate::models::{Chunk, CodedChunk, ScoredChunk};

use super::columns;

/// Write a text file, creating parent directories as needed
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write plain chunks (with embeddings when attached)
pub fn write_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer.write_record([columns::CHUNK_ID, columns::TEXT, columns::EMBEDDING])?;
    for chunk in chunks {
        writer.write_record(chunk_fields(chunk)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write scored chunks with one column per theme
///
/// Optional columns appear only when at least one row carries a value.
/// Theme columns follow the theme order of the first row.
pub fn write_scored_chunks(path: &Path, scored: &[ScoredChunk<'_>]) -> Result<()> {
    let has_question = scored.iter().any(|s| s.question_similarity.is_some());
    let has_label = scored.iter().any(|s| s.most_similar_theme.is_some());
    let themes: Vec<&str> = scored
        .first()
        .map(|s| s.theme_similarities.iter().map(|t| t.theme.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec![columns::CHUNK_ID, columns::TEXT, columns::EMBEDDING];
    if has_question {
        header.push(columns::QUESTION_SIMILARITY);
    }
    header.extend(themes.iter().copied());
    if has_label {
        header.push(columns::MOST_SIMILAR_THEME);
    }

    let mut writer = open_writer(path)?;
    writer.write_record(&header)?;

    for row in scored {
        let mut fields = chunk_fields(row.chunk)?;
        if has_question {
            fields.push(optional_score(row.question_similarity));
        }
        for theme in &themes {
            fields.push(optional_score(row.theme_score(theme)));
        }
        if has_label {
            fields.push(row.most_similar_theme.clone().unwrap_or_default());
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write LLM coding results
pub fn write_coded_chunks(path: &Path, coded: &[CodedChunk]) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer.write_record([
        columns::CHUNK_ID,
        columns::TEXT,
        columns::LLM_CODE_YES_NO,
        columns::ANY_NONVERBAL_CUE,
        columns::CUE_TYPE,
    ])?;

    for row in coded {
        writer.write_record([
            row.chunk_id.to_string(),
            row.text.clone(),
            row.theme_code
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            row.cues
                .as_ref()
                .map(|c| c.yes_no().to_string())
                .unwrap_or_default(),
            row.cues
                .as_ref()
                .map(|c| c.cue_type.clone())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    ensure_parent_dir(path)?;
    Ok(csv::Writer::from_path(path)?)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// `chunk_id`, `text`, and the embedding as a JSON array (empty when absent)
fn chunk_fields(chunk: &Chunk) -> Result<Vec<String>> {
    let embedding = match &chunk.embedding {
        Some(vector) => serde_json::to_string(vector)?,
        None => String::new(),
    };
    Ok(vec![chunk.chunk_id.to_string(), chunk.text.clone(), embedding])
}

fn optional_score(score: Option<f32>) -> String {
    score.map(|s| s.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_chunk_table;
    use crate::models::{CueSource, NonverbalCues, ThemeCode, ThemeScore};

    #[test]
    fn test_write_and_read_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/chunks.csv");
        let chunks = vec![
            Chunk::new(1, "First, with \"quotes\"\nand a newline").with_embedding(vec![0.5, -1.0]),
            Chunk::new(2, "Second"),
        ];

        write_chunks(&path, &chunks).unwrap();
        let records = read_chunk_table(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chunk, chunks[0]);
        assert_eq!(records[1].chunk, chunks[1]);
        assert!(records[0].question_similarity.is_none());
    }

    #[test]
    fn test_write_scored_chunks_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scored.csv");
        let chunk = Chunk::new(4, "text").with_embedding(vec![1.0, 0.0]);
        let mut scored = ScoredChunk::new(&chunk).with_question_similarity(0.5);
        scored.theme_similarities = vec![
            ThemeScore {
                theme: "Trust".to_string(),
                score: 1.0,
            },
            ThemeScore {
                theme: "Logistics".to_string(),
                score: 0.0,
            },
        ];
        scored.most_similar_theme = Some("Trust".to_string());

        write_scored_chunks(&path, &[scored]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "chunk_id,text,embedding,question_similarity,Trust,Logistics,most_similar_theme"
        );
        assert_eq!(lines.next().unwrap(), "4,text,\"[1.0,0.0]\",0.5,1,0,Trust");

        let records = read_chunk_table(&path).unwrap();
        assert_eq!(records[0].question_similarity, Some(0.5));
        assert_eq!(records[0].chunk, chunk);
    }

    #[test]
    fn test_write_coded_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coded.csv");
        let coded = vec![CodedChunk {
            chunk_id: 2,
            text: "ja".to_string(),
            theme_code: Some(ThemeCode::Yes),
            cues: Some(NonverbalCues {
                any_cues: true,
                cue_type: "Laughter".to_string(),
                source: CueSource::KeywordFallback,
            }),
        }];

        write_coded_chunks(&path, &coded).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "chunk_id,text,llm_code_yes_no,any_nonverbal_cue,cue_type\n2,ja,YES,YES,Laughter\n"
        );
    }
}
