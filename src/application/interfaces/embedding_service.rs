use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingConfig};

/// Turns text into L2-normalized embedding vectors.
///
/// Implementations own their model and load it at most once.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Embed several texts; the output order matches the input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
