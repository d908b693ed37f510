use async_trait::async_trait;

use crate::domain::{records, ChunkRecord, DeletionReport, DomainError, SourceSummary};

/// Durable, ordered collection of chunk records.
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Read every stored record in insertion order. An absent store is empty.
    async fn load(&self) -> Result<Vec<ChunkRecord>, DomainError>;

    /// Append a batch after the existing records. Either the whole batch is
    /// stored or nothing is.
    async fn append(&self, records: Vec<ChunkRecord>) -> Result<(), DomainError>;

    /// Remove every record of `source`. The report counts what was removed and
    /// what remained at that moment. Fails with `NotFound` when the source has
    /// no records.
    async fn delete_by_source(&self, source: &str) -> Result<DeletionReport, DomainError>;

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.load().await?.len() as u64)
    }

    async fn sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
        Ok(records::summarize_sources(&self.load().await?))
    }
}
