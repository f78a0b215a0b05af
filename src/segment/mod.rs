pub mod paragraphs;
pub mod speakers;

pub use paragraphs::*;
pub use speakers::*;
