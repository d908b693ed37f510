use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{ChatClient, EmbeddingService, VectorRepository};
use crate::domain::{ChatAnswer, Citation, DomainError, Retriever, SearchResult};

pub const DEFAULT_TOP_K: usize = 5;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question using only \
the numbered context passages provided. If the context does not contain the answer, say that \
you don't know. Keep answers concise.";

/// Answers questions from the indexed chunks: embed the question, rank the
/// store, and hand the best chunks to the chat model as context.
pub struct AnswerQuestionUseCase {
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
    chat_client: Arc<dyn ChatClient>,
}

impl AnswerQuestionUseCase {
    pub fn new(
        vector_repo: Arc<dyn VectorRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
        chat_client: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            vector_repo,
            embedding_service,
            chat_client,
        }
    }

    pub async fn execute(
        &self,
        question: &str,
        top_k: Option<usize>,
    ) -> Result<ChatAnswer, DomainError> {
        let results = self.retrieve(question, top_k, None).await?;

        let context = build_context(&results);
        let user_prompt = format!("Context:\n{}\n\nQuestion: {}", context, question.trim());
        debug!("Prompt context is {} chars", context.len());

        let start_time = Instant::now();
        let answer = self
            .chat_client
            .complete(SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| match e {
                DomainError::GenerationError(_) => e,
                other => DomainError::generation(other.to_string()),
            })?;

        info!(
            "Generated answer from {} chunks in {:.2}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(ChatAnswer::new(
            answer,
            results.iter().map(Citation::from).collect(),
        ))
    }

    /// Rank stored chunks against `question` without calling the chat model.
    ///
    /// Fails with `EmptyStore` when nothing has been ingested.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: Option<usize>,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::invalid_input("'question' is required"));
        }

        let top_k = top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(DomainError::invalid_input("'topK' must be at least 1"));
        }
        info!("Answering question (top_k={}): {}", top_k, question);

        let start_time = Instant::now();
        let query_vector = self.embedding_service.embed_query(question).await?;

        let records = self.vector_repo.load().await?;
        if records.is_empty() {
            return Err(DomainError::EmptyStore);
        }

        let total = records.len();
        let mut results = Retriever::search(&query_vector, records, top_k);
        if let Some(threshold) = min_score {
            results.retain(|r| r.is_relevant(threshold));
        }

        info!(
            "Retrieved {} of {} chunks in {:.2}s",
            results.len(),
            total,
            start_time.elapsed().as_secs_f64()
        );

        Ok(results)
    }
}

/// Number each retrieved chunk by rank so the model can refer to it.
fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}] (source: {}) {}",
                i + 1,
                r.record().source(),
                r.record().text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
