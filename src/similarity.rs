use crate::error::{CodingError, Result};

/// Dot product of two vectors of equal length
///
/// Vectors are not normalized. Embedding models that return unit vectors make
/// this equal to cosine similarity.
pub fn similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(CodingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Score every item against the query and keep the best `k`
///
/// Results are ordered by score, highest first; equal scores keep input order.
pub fn rank_by_similarity<'v, I, T>(query: &[f32], items: I, k: usize) -> Result<Vec<(T, f32)>>
where
    I: IntoIterator<Item = (T, &'v [f32])>,
{
    let mut scored = items
        .into_iter()
        .map(|(id, vector)| similarity(query, vector).map(|score| (id, score)))
        .collect::<Result<Vec<_>>>()?;

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    Ok(scored)
}
