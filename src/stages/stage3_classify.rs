use tracing::{debug, info};

use crate::error::{CodingError, Result};
use crate::models::{ScoredChunk, Theme, ThemeScore};
use crate::similarity::similarity;

/// Result of Stage 3
#[derive(Debug)]
pub struct Stage3Result<'a> {
    /// Input chunks with theme columns and labels, in input order
    pub classified: Vec<ScoredChunk<'a>>,
    /// Number of chunks per theme, in theme order (zero counts included)
    pub counts: Vec<(String, usize)>,
}

/// Fill one similarity column per theme, in theme order
///
/// Existing theme columns are replaced.
pub fn add_theme_similarities<'a>(
    scored: Vec<ScoredChunk<'a>>,
    themes: &[Theme],
) -> Result<Vec<ScoredChunk<'a>>> {
    let theme_vectors = themes
        .iter()
        .map(|t| t.require_embedding().map(|v| (t.short_name.as_str(), v)))
        .collect::<Result<Vec<_>>>()?;

    scored
        .into_iter()
        .map(|mut row| -> Result<ScoredChunk<'a>> {
            let embedding = row.chunk.require_embedding()?;
            row.theme_similarities = theme_vectors
                .iter()
                .map(|(name, vector)| {
                    similarity(embedding, vector).map(|score| ThemeScore {
                        theme: name.to_string(),
                        score,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(row)
        })
        .collect()
}

/// Label each chunk with its most similar theme
///
/// Ties go to the theme listed first.
pub fn classify_by_max_theme<'a>(
    scored: Vec<ScoredChunk<'a>>,
    themes: &[Theme],
) -> Result<Vec<ScoredChunk<'a>>> {
    if themes.is_empty() {
        return Err(CodingError::NoThemes);
    }

    let mut scored = add_theme_similarities(scored, themes)?;
    for row in &mut scored {
        row.most_similar_theme = arg_max(&row.theme_similarities).map(str::to_string);
        debug!(
            "Chunk {} -> {:?}",
            row.chunk_id(),
            row.most_similar_theme.as_deref()
        );
    }
    Ok(scored)
}

/// Non-finite scores are never selected.
fn arg_max(scores: &[ThemeScore]) -> Option<&str> {
    let mut best: Option<&ThemeScore> = None;
    for candidate in scores.iter().filter(|s| s.score.is_finite()) {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|s| s.theme.as_str())
}

/// Count classified chunks per theme, in theme order
pub fn theme_counts(classified: &[ScoredChunk<'_>], themes: &[Theme]) -> Vec<(String, usize)> {
    themes
        .iter()
        .map(|theme| {
            let count = classified
                .iter()
                .filter(|row| row.most_similar_theme.as_deref() == Some(theme.short_name.as_str()))
                .count();
            (theme.short_name.clone(), count)
        })
        .collect()
}

/// Best `n` chunks labelled with `theme`, highest theme score first
pub fn top_examples<'s, 'a>(
    classified: &'s [ScoredChunk<'a>],
    theme: &str,
    n: usize,
) -> Vec<&'s ScoredChunk<'a>> {
    let mut rows: Vec<&ScoredChunk<'a>> = classified
        .iter()
        .filter(|row| row.most_similar_theme.as_deref() == Some(theme))
        .collect();
    rows.sort_by(|a, b| {
        let a = a.theme_score(theme).unwrap_or(f32::NEG_INFINITY);
        let b = b.theme_score(theme).unwrap_or(f32::NEG_INFINITY);
        b.total_cmp(&a)
    });
    rows.truncate(n);
    rows
}

/// Execute Stage 3: theme classification
pub fn execute_stage3<'a>(scored: Vec<ScoredChunk<'a>>, themes: &[Theme]) -> Result<Stage3Result<'a>> {
    let classified = classify_by_max_theme(scored, themes)?;
    let counts = theme_counts(&classified, themes);

    info!(
        "Stage 3: classified {} chunks against {} themes",
        classified.len(),
        themes.len()
    );

    Ok(Stage3Result { classified, counts })
}
