use std::sync::Arc;

use crate::application::VectorRepository;
use crate::domain::{records, DomainError, StoreStats};

pub struct StoreStatsUseCase {
    vector_repo: Arc<dyn VectorRepository>,
}

impl StoreStatsUseCase {
    pub fn new(vector_repo: Arc<dyn VectorRepository>) -> Self {
        Self { vector_repo }
    }

    pub async fn execute(&self) -> Result<StoreStats, DomainError> {
        // One load so the total and the per-source counts agree.
        let stored = self.vector_repo.load().await?;

        Ok(StoreStats {
            chunks: stored.len() as u64,
            sources: records::summarize_sources(&stored),
        })
    }
}
