use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorRepository;
use crate::domain::{records, ChunkRecord, DeletionReport, DomainError};

/// Process-local vector store; contents are lost when the process exits.
pub struct InMemoryVectorRepository {
    records: Mutex<Vec<ChunkRecord>>,
}

impl InMemoryVectorRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorRepository for InMemoryVectorRepository {
    async fn load(&self) -> Result<Vec<ChunkRecord>, DomainError> {
        Ok(self.records.lock().await.clone())
    }

    async fn append(&self, incoming: Vec<ChunkRecord>) -> Result<(), DomainError> {
        let mut stored = self.records.lock().await;
        records::validate_append(&stored, &incoming)?;

        debug!("Saved {} records to memory", incoming.len());
        stored.extend(incoming);
        Ok(())
    }

    async fn delete_by_source(&self, source: &str) -> Result<DeletionReport, DomainError> {
        let mut stored = self.records.lock().await;
        records::remove_source(&mut stored, source)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.records.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_then_load_preserves_order() {
        let repo = InMemoryVectorRepository::new();
        let first = ChunkRecord::new("one", "a", vec![1.0, 0.0]);
        let second = ChunkRecord::new("two", "b", vec![0.0, 1.0]);

        repo.append(vec![first.clone()]).await.unwrap();
        repo.append(vec![second.clone()]).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_rejected_batch_leaves_store_unchanged() {
        let repo = InMemoryVectorRepository::new();
        repo.append(vec![ChunkRecord::new("one", "a", vec![1.0, 0.0])])
            .await
            .unwrap();

        let bad_batch = vec![
            ChunkRecord::new("two", "a", vec![1.0, 0.0]),
            ChunkRecord::new("three", "a", vec![1.0]),
        ];
        assert!(repo.append(bad_batch).await.is_err());

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sources_are_summarized() {
        let repo = InMemoryVectorRepository::new();
        repo.append(vec![
            ChunkRecord::new("one", "a", vec![1.0]),
            ChunkRecord::new("two", "a", vec![1.0]),
            ChunkRecord::new("three", "b", vec![1.0]),
        ])
        .await
        .unwrap();

        let sources = repo.sources().await.unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source, "a");
        assert_eq!(sources[0].chunks, 2);
    }
}
