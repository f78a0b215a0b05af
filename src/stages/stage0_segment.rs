use tracing::info;

use crate::models::Chunk;
use crate::segment::{chunk_by_moderator_question, make_chunks};

/// Configuration for Stage 0
#[derive(Debug, Clone)]
pub struct Stage0Config {
    /// Minimum characters per merged chunk
    pub min_chars: usize,
    /// Regroup speaker turns by moderator question before merging
    pub by_moderator: bool,
}

impl Default for Stage0Config {
    fn default() -> Self {
        Self {
            min_chars: 250,
            by_moderator: false,
        }
    }
}

/// Result of Stage 0
#[derive(Debug)]
pub struct Stage0Result {
    pub chunks: Vec<Chunk>,
    /// Number of moderator sections found, when regrouping was requested
    pub moderator_sections: Option<usize>,
}

/// Execute Stage 0: segmentation
///
/// With `by_moderator`, each moderator question and its responses become one
/// section (separated by `---` lines) before paragraph merging.
pub fn execute_stage0(text: &str, config: &Stage0Config) -> Stage0Result {
    let (source, moderator_sections) = if config.by_moderator {
        let regrouped = chunk_by_moderator_question(text);
        let sections = if regrouped.is_empty() {
            0
        } else {
            regrouped.matches(crate::segment::GROUP_SEPARATOR).count() + 1
        };
        info!("Stage 0: {} moderator sections", sections);
        (regrouped, Some(sections))
    } else {
        (text.to_string(), None)
    };

    let chunks = make_chunks(&source, config.min_chars);
    info!(
        "Stage 0: {} chunks (min {} chars)",
        chunks.len(),
        config.min_chars
    );

    Stage0Result {
        chunks,
        moderator_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segmentation() {
        let text = "# Transcript\n\nShort.\n\nAnother short one.";
        let result = execute_stage0(
            text,
            &Stage0Config {
                min_chars: 1000,
                by_moderator: false,
            },
        );

        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].text, "Short.\n\nAnother short one.");
        assert!(result.moderator_sections.is_none());
    }

    #[test]
    fn test_moderator_segmentation_keeps_separator_paragraphs() {
        let text = "MODERADOR: ¿Q1?\nANA: uno\nMODERADOR: ¿Q2?\nLUIS: dos\n";
        let result = execute_stage0(
            text,
            &Stage0Config {
                min_chars: 1,
                by_moderator: true,
            },
        );

        assert_eq!(result.moderator_sections, Some(2));
        let texts: Vec<&str> = result.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["¿Q1?", "ANA: uno", "---", "¿Q2?", "LUIS: dos"]);
    }
}
