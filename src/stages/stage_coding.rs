use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::llm::{Generator, code_nonverbal_cues, code_yes_no_for_theme};
use crate::models::{Chunk, CodedChunk};

/// What to ask the LLM about each chunk
#[derive(Debug, Clone, Default)]
pub struct CodingConfig {
    /// Theme definition for yes/no coding, if any
    pub theme_definition: Option<String>,
    /// Whether to code non-verbal cues
    pub nonverbal_cues: bool,
    /// Maximum number of chunks to send (first N in order)
    pub limit: usize,
}

/// Execute LLM coding over the first `limit` chunks, one call per chunk and task
pub async fn execute_coding<G>(
    generator: &G,
    pipeline: &PipelineConfig,
    chunks: &[Chunk],
    config: &CodingConfig,
) -> Result<Vec<CodedChunk>>
where
    G: Generator + ?Sized,
{
    let selected = &chunks[..chunks.len().min(config.limit)];
    let mut coded = Vec::with_capacity(selected.len());

    for chunk in selected {
        let theme_code = match &config.theme_definition {
            Some(theme) => Some(code_yes_no_for_theme(generator, pipeline, &chunk.text, theme).await?),
            None => None,
        };
        let cues = if config.nonverbal_cues {
            Some(code_nonverbal_cues(generator, pipeline, &chunk.text).await?)
        } else {
            None
        };

        coded.push(CodedChunk {
            chunk_id: chunk.chunk_id,
            text: chunk.text.clone(),
            theme_code,
            cues,
        });
    }

    info!("Coded {} of {} chunks", coded.len(), chunks.len());
    Ok(coded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;
    use crate::models::{CueSource, ThemeCode};

    #[tokio::test]
    async fn test_coding_respects_limit_and_order() {
        let generator = ScriptedGenerator::new(vec![
            "YES",
            r#"{"any_cues": "YES", "cue_type": "Laughter"}"#,
            "NO",
            "garbled",
        ]);
        let chunks = vec![
            Chunk::new(1, "we laughed"),
            Chunk::new(2, "serious talk"),
            Chunk::new(3, "never sent"),
        ];
        let config = CodingConfig {
            theme_definition: Some("Trust: families trusted staff".to_string()),
            nonverbal_cues: true,
            limit: 2,
        };

        let coded = execute_coding(&generator, &PipelineConfig::default(), &chunks, &config)
            .await
            .unwrap();

        assert_eq!(coded.len(), 2);
        assert_eq!(coded[0].theme_code, Some(ThemeCode::Yes));
        assert_eq!(coded[0].cues.as_ref().unwrap().source, CueSource::Json);
        assert_eq!(coded[1].theme_code, Some(ThemeCode::No));
        let fallback = coded[1].cues.as_ref().unwrap();
        assert_eq!(fallback.source, CueSource::KeywordFallback);
        assert!(!fallback.any_cues);
        assert_eq!(generator.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_coding_theme_only() {
        let generator = ScriptedGenerator::new(vec!["NO"]);
        let chunks = vec![Chunk::new(1, "text")];
        let config = CodingConfig {
            theme_definition: Some("Trust".to_string()),
            nonverbal_cues: false,
            limit: 10,
        };

        let coded = execute_coding(&generator, &PipelineConfig::default(), &chunks, &config)
            .await
            .unwrap();

        assert_eq!(coded[0].theme_code, Some(ThemeCode::No));
        assert!(coded[0].cues.is_none());
    }
}
