use tracing::info;

use crate::error::Result;
use crate::models::{Chunk, ScoredChunk};
use crate::similarity::similarity;

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct Stage2Config {
    /// Minimum question similarity for a chunk to be kept
    pub threshold: f32,
}

impl Default for Stage2Config {
    fn default() -> Self {
        Self { threshold: 0.20 }
    }
}

/// Result of Stage 2
#[derive(Debug)]
pub struct Stage2Result<'a> {
    /// Chunks at or above the threshold, ascending by score
    pub kept: Vec<ScoredChunk<'a>>,
    /// Chunks below the threshold, ascending by score
    pub dropped: Vec<ScoredChunk<'a>>,
}

/// Score each chunk against the research question embedding
///
/// Output keeps chunk order. Every chunk must already carry an embedding.
pub fn compute_relevance<'a>(
    chunks: &'a [Chunk],
    question_embedding: &[f32],
) -> Result<Vec<ScoredChunk<'a>>> {
    chunks
        .iter()
        .map(|chunk| -> Result<ScoredChunk<'a>> {
            let score = similarity(chunk.require_embedding()?, question_embedding)?;
            Ok(ScoredChunk::new(chunk).with_question_similarity(score))
        })
        .collect()
}

/// Keep chunks scoring at least `threshold`, sorted ascending by score
///
/// Equal scores keep their incoming order. Unscored chunks never pass.
pub fn filter_relevant<'a>(scored: Vec<ScoredChunk<'a>>, threshold: f32) -> Vec<ScoredChunk<'a>> {
    let mut kept: Vec<ScoredChunk<'a>> = scored
        .into_iter()
        .filter(|s| is_relevant(s, threshold))
        .collect();
    sort_ascending(&mut kept);
    kept
}

fn is_relevant(scored: &ScoredChunk<'_>, threshold: f32) -> bool {
    scored.question_similarity.is_some_and(|q| q >= threshold)
}

fn sort_ascending(scored: &mut [ScoredChunk<'_>]) {
    scored.sort_by(|a, b| {
        let a = a.question_similarity.unwrap_or(f32::NEG_INFINITY);
        let b = b.question_similarity.unwrap_or(f32::NEG_INFINITY);
        a.total_cmp(&b)
    });
}

/// Execute Stage 2: relevance scoring and filtering
pub fn execute_stage2<'a>(
    chunks: &'a [Chunk],
    question_embedding: &[f32],
    config: &Stage2Config,
) -> Result<Stage2Result<'a>> {
    let scored = compute_relevance(chunks, question_embedding)?;

    let mut dropped: Vec<ScoredChunk<'a>> = scored
        .iter()
        .filter(|s| !is_relevant(s, config.threshold))
        .cloned()
        .collect();
    sort_ascending(&mut dropped);
    let kept = filter_relevant(scored, config.threshold);

    info!(
        "Stage 2: kept {}/{} chunks with score >= {}",
        kept.len(),
        chunks.len(),
        config.threshold
    );

    Ok(Stage2Result { kept, dropped })
}
