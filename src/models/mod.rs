pub mod chunk;
pub mod coding;
pub mod theme;
pub mod transcript;

pub use chunk::*;
pub use coding::*;
pub use theme::*;
pub use transcript::*;
