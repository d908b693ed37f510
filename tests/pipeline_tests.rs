//! End-to-end tests for the ingest, answer and delete pipeline.
//!
//! These run against a JSON store in a temporary directory with the offline
//! embedding service and an in-test chat client.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use minirag::{
    AnswerQuestionUseCase, ChatClient, DeleteSourceUseCase, DomainError, EmbeddingService,
    IngestDocumentUseCase, JsonVectorRepository, MockEmbedding, StoreStatsUseCase, TextChunker,
    VectorRepository,
};
use tempfile::{tempdir, TempDir};

/// Records the prompts it receives and answers with a fixed string.
#[derive(Default)]
struct RecordingChat {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(user.to_string());
        Ok("Paris.".to_string())
    }
}

struct FailingChat;

#[async_trait]
impl ChatClient for FailingChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, DomainError> {
        Err(DomainError::generation("upstream unavailable"))
    }
}

struct TestEnv {
    _dir: TempDir,
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
    chat: Arc<RecordingChat>,
}

impl TestEnv {
    fn new() -> Self {
        let dir = tempdir().expect("tempdir");
        let vector_repo: Arc<dyn VectorRepository> =
            Arc::new(JsonVectorRepository::new(dir.path().join("vector_store.json")));

        Self {
            _dir: dir,
            vector_repo,
            embedding_service: Arc::new(MockEmbedding::new()),
            chat: Arc::new(RecordingChat::default()),
        }
    }

    fn ingest(&self) -> IngestDocumentUseCase {
        IngestDocumentUseCase::new(
            self.vector_repo.clone(),
            self.embedding_service.clone(),
            TextChunker::default(),
        )
    }

    fn answer(&self) -> AnswerQuestionUseCase {
        AnswerQuestionUseCase::new(
            self.vector_repo.clone(),
            self.embedding_service.clone(),
            self.chat.clone(),
        )
    }

    fn delete(&self) -> DeleteSourceUseCase {
        DeleteSourceUseCase::new(self.vector_repo.clone())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ingest_chat_delete_round_trip() {
    let env = TestEnv::new();

    let inserted = env
        .ingest()
        .execute("Paris is the capital of France.", Some("geo"))
        .await
        .expect("ingest");
    assert_eq!(inserted, 1);

    let answer = env
        .answer()
        .execute("What is the capital of France?", Some(1))
        .await
        .expect("chat");
    assert_eq!(answer.answer, "Paris.");
    assert_eq!(answer.chunks.len(), 1);
    assert_eq!(answer.chunks[0].text, "Paris is the capital of France.");
    assert_eq!(answer.chunks[0].source, "geo");
    assert!(answer.chunks[0].score > 0.5, "score {}", answer.chunks[0].score);

    let report = env.delete().execute("geo").await.expect("delete");
    assert_eq!(report.removed, 1);
    assert_eq!(report.remaining, 0);

    let err = env
        .answer()
        .execute("What is the capital of France?", Some(1))
        .await
        .unwrap_err();
    assert!(err.is_empty_store());
}

#[tokio::test]
async fn test_prompt_contains_ranked_context_and_question() {
    let env = TestEnv::new();
    env.ingest()
        .execute("Paris is the capital of France.", Some("geo"))
        .await
        .expect("ingest");

    env.answer()
        .execute("What is the capital of France?", None)
        .await
        .expect("chat");

    let prompts = env.chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[1] (source: geo) Paris is the capital of France."));
    assert!(prompts[0].contains("What is the capital of France?"));
}

#[tokio::test]
async fn test_multi_chunk_document_keeps_order_and_source() {
    let env = TestEnv::new();
    let text = (0..30)
        .map(|i| format!("Line {} talks about topic number {}.", i, i))
        .collect::<Vec<_>>()
        .join("\n");

    let chunker = TextChunker::new(120);
    let expected = chunker.chunk(&text);
    let use_case =
        IngestDocumentUseCase::new(env.vector_repo.clone(), env.embedding_service.clone(), chunker);

    let inserted = use_case.execute(&text, Some("notes")).await.expect("ingest");
    let records = env.vector_repo.load().await.expect("load");

    assert_eq!(inserted, expected.len());
    assert!(inserted > 1);
    let stored: Vec<&str> = records.iter().map(|r| r.text()).collect();
    assert_eq!(stored, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(records.iter().all(|r| r.source() == "notes"));
}

#[tokio::test]
async fn test_generation_failure_keeps_ingested_chunks() {
    let env = TestEnv::new();
    env.ingest()
        .execute("Paris is the capital of France.", None)
        .await
        .expect("ingest");

    let use_case = AnswerQuestionUseCase::new(
        env.vector_repo.clone(),
        env.embedding_service.clone(),
        Arc::new(FailingChat),
    );
    let err = use_case
        .execute("What is the capital of France?", None)
        .await
        .unwrap_err();

    assert!(err.is_generation_error());
    assert!(err.to_string().contains("upstream unavailable"));
    assert_eq!(env.vector_repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_stats_group_chunks_by_source() {
    let env = TestEnv::new();
    env.ingest()
        .execute("First manual note.", None)
        .await
        .expect("ingest");
    env.ingest()
        .execute("Paris is the capital of France.", Some("geo"))
        .await
        .expect("ingest");
    env.ingest()
        .execute("Second manual note.", Some("  "))
        .await
        .expect("ingest");

    let stats = StoreStatsUseCase::new(env.vector_repo.clone())
        .execute()
        .await
        .expect("stats");

    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.sources.len(), 2);
    assert_eq!(stats.sources[0].source, "manual");
    assert_eq!(stats.sources[0].chunks, 2);
    assert_eq!(stats.sources[1].source, "geo");
}

#[tokio::test]
async fn test_delete_unknown_source_is_not_found() {
    let env = TestEnv::new();

    let err = env.delete().execute("nope").await.unwrap_err();

    assert!(err.is_not_found());
}
