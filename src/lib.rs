pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod segment;
pub mod similarity;
pub mod stages;

pub use config::PipelineConfig;
pub use error::{CodingError, Result};
pub use io::{read_chunk_table, read_text_file, write_chunks, write_coded_chunks, write_scored_chunks, write_text_file};
pub use llm::{Embedder, GenerateOptions, Generator, OpenAiClient, OpenAiConfig};
pub use models::{Chunk, ChunkRecord, CodedChunk, ModeratorGroup, ScoredChunk, SpeakerTurn, Theme};
pub use segment::{chunk_by_moderator_question, group_by_moderator, make_chunks, parse_speakers};
pub use similarity::{rank_by_similarity, similarity};
pub use stages::{
    execute_coding, execute_stage0, execute_stage1, execute_stage2, execute_stage3, CodingConfig,
    Stage0Config, Stage2Config,
};
