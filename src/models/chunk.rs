use serde::{Deserialize, Serialize};

use crate::error::{CodingError, Result};

/// A numbered unit of transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position in the order chunks were produced
    pub chunk_id: usize,
    /// Chunk body text
    pub text: String,
    /// Embedding vector, attached after segmentation
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    pub fn new(chunk_id: usize, text: impl Into<String>) -> Self {
        Self {
            chunk_id,
            text: text.into(),
            embedding: None,
        }
    }

    /// Attach an embedding vector to this chunk
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Borrow the embedding or fail if none is attached
    pub fn require_embedding(&self) -> Result<&[f32]> {
        self.embedding
            .as_deref()
            .ok_or_else(|| CodingError::MissingEmbedding(format!("chunk {}", self.chunk_id)))
    }
}

/// Similarity between a chunk and one theme
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeScore {
    /// Theme short name
    pub theme: String,
    pub score: f32,
}

/// Derived view of a chunk carrying scores and a classification label
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk<'a> {
    /// The underlying chunk (borrowed, never modified)
    pub chunk: &'a Chunk,
    /// Similarity to the research question
    pub question_similarity: Option<f32>,
    /// One entry per theme, in theme order
    pub theme_similarities: Vec<ThemeScore>,
    /// Short name of the best-matching theme
    pub most_similar_theme: Option<String>,
}

impl<'a> ScoredChunk<'a> {
    /// Create an unscored view of a chunk
    pub fn new(chunk: &'a Chunk) -> Self {
        Self {
            chunk,
            question_similarity: None,
            theme_similarities: Vec::new(),
            most_similar_theme: None,
        }
    }

    pub fn with_question_similarity(mut self, score: f32) -> Self {
        self.question_similarity = Some(score);
        self
    }

    pub fn chunk_id(&self) -> usize {
        self.chunk.chunk_id
    }

    /// Score for the given theme, if computed
    pub fn theme_score(&self, theme: &str) -> Option<f32> {
        self.theme_similarities
            .iter()
            .find(|s| s.theme == theme)
            .map(|s| s.score)
    }
}

/// A chunk read back from a chunk table, with any persisted relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub chunk: Chunk,
    pub question_similarity: Option<f32>,
}

impl ChunkRecord {
    /// Build a scored view that carries the persisted relevance score forward
    pub fn scored(&self) -> ScoredChunk<'_> {
        ScoredChunk {
            question_similarity: self.question_similarity,
            ..ScoredChunk::new(&self.chunk)
        }
    }
}
