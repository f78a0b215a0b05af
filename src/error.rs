use thiserror::Error;

/// Errors raised by the coding pipeline
#[derive(Error, Debug)]
pub enum CodingError {
    /// Two vectors from different embedding spaces were compared
    #[error("Vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Scoring was requested before an embedding was attached
    #[error("Missing embedding for {0}")]
    MissingEmbedding(String),

    /// A theme list or chunk table could not be parsed
    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("No themes to classify against")]
    NoThemes,

    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("Generation provider error: {0}")]
    GenerationProvider(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodingError>;
