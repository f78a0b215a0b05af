pub mod client;
pub mod cue_parser;
pub mod prompts;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use client::*;
pub use cue_parser::*;
pub use prompts::*;
pub use tasks::*;
