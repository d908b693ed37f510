pub mod ask_controller;
pub mod delete_controller;
pub mod ingest_controller;
pub mod search_controller;
pub mod stats_controller;

pub use ask_controller::AskController;
pub use delete_controller::DeleteController;
pub use ingest_controller::IngestController;
pub use search_controller::SearchController;
pub use stats_controller::StatsController;
