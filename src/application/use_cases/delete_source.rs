use std::sync::Arc;

use tracing::info;

use crate::application::VectorRepository;
use crate::domain::{DeletionReport, DomainError};

/// Use case for removing every chunk ingested under one source label.
pub struct DeleteSourceUseCase {
    vector_repo: Arc<dyn VectorRepository>,
}

impl DeleteSourceUseCase {
    pub fn new(vector_repo: Arc<dyn VectorRepository>) -> Self {
        Self { vector_repo }
    }

    pub async fn execute(&self, source: &str) -> Result<DeletionReport, DomainError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(DomainError::invalid_input("'source' is required"));
        }

        info!("Deleting source: {}", source);

        let report = self.vector_repo.delete_by_source(source).await?;

        info!(
            "Removed {} chunks for source '{}', {} remaining",
            report.removed, report.source, report.remaining
        );

        Ok(report)
    }
}
