pub mod stage0_segment;
pub mod stage1_embed;
pub mod stage2_relevance;
pub mod stage3_classify;
pub mod stage_coding;

pub use stage0_segment::*;
pub use stage1_embed::*;
pub use stage2_relevance::*;
pub use stage3_classify::*;
pub use stage_coding::*;
