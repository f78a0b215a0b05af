pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

/// Column names of the chunk table
pub mod columns {
    pub const CHUNK_ID: &str = "chunk_id";
    pub const TEXT: &str = "text";
    /// JSON-encoded array of floats in a single field
    pub const EMBEDDING: &str = "embedding";
    pub const QUESTION_SIMILARITY: &str = "question_similarity";
    pub const MOST_SIMILAR_THEME: &str = "most_similar_theme";
    pub const LLM_CODE_YES_NO: &str = "llm_code_yes_no";
    pub const ANY_NONVERBAL_CUE: &str = "any_nonverbal_cue";
    pub const CUE_TYPE: &str = "cue_type";
}
