//! Domain services containing the pure pipeline logic.

mod chunker;
pub mod records;
mod retriever;

pub use chunker::*;
pub use retriever::*;
