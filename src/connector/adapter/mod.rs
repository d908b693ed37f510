mod anthropic_client;
mod in_memory_vector_repository;
mod json_vector_repository;
mod mock_chat_client;
mod mock_embedding;
mod ort_embedding;

pub use anthropic_client::*;
pub use in_memory_vector_repository::*;
pub use json_vector_repository::*;
pub use mock_chat_client::*;
pub use mock_embedding::*;
pub use ort_embedding::*;
