mod answer_question;
mod delete_source;
mod ingest_document;
mod store_stats;

pub use answer_question::*;
pub use delete_source::*;
pub use ingest_document::*;
pub use store_stats::*;
