mod chunk_record;
mod embedding;
mod search_result;
mod store_summary;

pub use chunk_record::*;
pub use embedding::*;
pub use search_result::*;
pub use store_summary::*;
