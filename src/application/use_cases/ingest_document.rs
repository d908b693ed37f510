use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::application::{EmbeddingService, VectorRepository};
use crate::domain::{ChunkRecord, DomainError, TextChunker};

/// Source label used when the caller does not supply one.
pub const DEFAULT_SOURCE: &str = "manual";

const EMBED_BATCH_SIZE: usize = 32;
const MAX_CONCURRENT_BATCHES: usize = 4;

pub struct IngestDocumentUseCase {
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
    chunker: TextChunker,
}

impl IngestDocumentUseCase {
    pub fn new(
        vector_repo: Arc<dyn VectorRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            vector_repo,
            embedding_service,
            chunker,
        }
    }

    /// Chunk, embed and store `text` under `source`, returning the number of
    /// chunks inserted.
    ///
    /// The store is only written once every chunk has been embedded, so a
    /// failure part-way through leaves it unchanged.
    pub async fn execute(&self, text: &str, source: Option<&str>) -> Result<usize, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::invalid_input("'text' is required"));
        }

        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE)
            .to_string();

        let start_time = Instant::now();

        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(DomainError::invalid_input("'text' produced no chunks"));
        }

        info!(
            "Ingesting {} chunks from source '{}' (max {} chars per chunk)",
            chunks.len(),
            source,
            self.chunker.max_chars()
        );

        let vectors = self.embed_all(&chunks).await?;

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| ChunkRecord::new(text, source.as_str(), vector))
            .collect();
        let inserted = records.len();

        self.vector_repo.append(records).await?;

        info!(
            "Inserted {} chunks from source '{}' in {:.2}s",
            inserted,
            source,
            start_time.elapsed().as_secs_f64()
        );

        Ok(inserted)
    }

    /// Embed chunks in fixed-size batches with a bounded number in flight.
    /// Output order follows `chunks`.
    async fn embed_all(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let owned_batches: Vec<Vec<String>> = chunks
            .chunks(EMBED_BATCH_SIZE)
            .map(<[String]>::to_vec)
            .collect();

        let batches: Vec<Vec<Vec<f32>>> = stream::iter(owned_batches)
            .map(|batch| {
                let embedding_service = self.embedding_service.clone();
                async move {
                    debug!("Embedding batch of {} chunks", batch.len());
                    embedding_service.embed_batch(&batch).await
                }
            })
            .buffered(MAX_CONCURRENT_BATCHES)
            .try_collect()
            .await?;

        let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        if vectors.len() != chunks.len() {
            return Err(DomainError::embedding(format!(
                "Expected {} embeddings, model returned {}",
                chunks.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}
