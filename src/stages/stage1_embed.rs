use tracing::{debug, info};

use crate::error::Result;
use crate::llm::Embedder;
use crate::models::Chunk;

/// Execute Stage 1: embed every chunk, one provider call per chunk, in order
///
/// Provider failures are not retried here; the first one aborts the stage.
pub async fn execute_stage1<E>(embedder: &E, chunks: Vec<Chunk>) -> Result<Vec<Chunk>>
where
    E: Embedder + ?Sized,
{
    let total = chunks.len();
    let mut embedded = Vec::with_capacity(total);

    for chunk in chunks {
        debug!("Embedding chunk {}/{}", chunk.chunk_id, total);
        let vector = embedder.embed(&chunk.text).await?;
        embedded.push(chunk.with_embedding(vector));
    }

    if let Some(dims) = embedded
        .first()
        .and_then(|c| c.embedding.as_ref())
        .map(Vec::len)
    {
        info!("Stage 1: embedded {} chunks ({} dims)", total, dims);
    }

    Ok(embedded)
}
