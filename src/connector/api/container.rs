use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::{
    AnswerQuestionUseCase, AnthropicClient, ChatClient, DeleteSourceUseCase, EmbeddingService,
    InMemoryVectorRepository, IngestDocumentUseCase, JsonVectorRepository, MockChatClient,
    MockEmbedding, OrtEmbedding, StoreStatsUseCase, TextChunker, VectorRepository,
    DEFAULT_MAX_CHARS,
};

pub const DEFAULT_STORE_FILE: &str = "vector_store.json";

pub struct ContainerConfig {
    pub data_dir: String,
    /// File name of the JSON store inside `data_dir`.
    pub store_file: String,
    pub mock_embeddings: bool,
    pub mock_llm: bool,
    pub memory_storage: bool,
    /// Embedding model id on the HuggingFace hub; `None` uses the default.
    pub model: Option<String>,
    pub chunk_size: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            data_dir: ".minirag".to_string(),
            store_file: DEFAULT_STORE_FILE.to_string(),
            mock_embeddings: false,
            mock_llm: false,
            memory_storage: false,
            model: None,
            chunk_size: DEFAULT_MAX_CHARS,
        }
    }
}

/// Wires the adapters once and hands out use cases built on them.
pub struct Container {
    embedding_service: Arc<dyn EmbeddingService>,
    vector_repo: Arc<dyn VectorRepository>,
    chat_client: Arc<dyn ChatClient>,
    chunker: TextChunker,
    store_location: String,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let embedding_service: Arc<dyn EmbeddingService> = if config.mock_embeddings {
            debug!("Using mock embedding service");
            Arc::new(MockEmbedding::new())
        } else {
            debug!("Using ONNX embedding service");
            Arc::new(OrtEmbedding::new(config.model.as_deref()))
        };

        let (vector_repo, store_location): (Arc<dyn VectorRepository>, String) =
            if config.memory_storage {
                debug!("Using in-memory vector storage");
                (Arc::new(InMemoryVectorRepository::new()), "memory".to_string())
            } else {
                std::fs::create_dir_all(&config.data_dir)?;
                let repo = JsonVectorRepository::new(
                    PathBuf::from(&config.data_dir).join(&config.store_file),
                );
                let location = repo.path().display().to_string();
                debug!("Using JSON vector storage at {}", location);
                (Arc::new(repo), location)
            };

        let chat_client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = AnthropicClient::from_env();
            debug!(
                "Using chat model {} at {}",
                client.model(),
                client.endpoint()
            );
            Arc::new(client)
        };

        let chunker = TextChunker::new(config.chunk_size);

        Ok(Self {
            embedding_service,
            vector_repo,
            chat_client,
            chunker,
            store_location,
            config,
        })
    }

    /// Build a container around already constructed services.
    pub fn with_services(
        embedding_service: Arc<dyn EmbeddingService>,
        vector_repo: Arc<dyn VectorRepository>,
        chat_client: Arc<dyn ChatClient>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            embedding_service,
            vector_repo,
            chat_client,
            chunker: TextChunker::new(config.chunk_size),
            store_location: "custom".to_string(),
            config,
        }
    }

    pub fn ingest_use_case(&self) -> IngestDocumentUseCase {
        IngestDocumentUseCase::new(
            self.vector_repo.clone(),
            self.embedding_service.clone(),
            self.chunker,
        )
    }

    pub fn answer_use_case(&self) -> AnswerQuestionUseCase {
        AnswerQuestionUseCase::new(
            self.vector_repo.clone(),
            self.embedding_service.clone(),
            self.chat_client.clone(),
        )
    }

    pub fn delete_use_case(&self) -> DeleteSourceUseCase {
        DeleteSourceUseCase::new(self.vector_repo.clone())
    }

    pub fn stats_use_case(&self) -> StoreStatsUseCase {
        StoreStatsUseCase::new(self.vector_repo.clone())
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn store_location(&self) -> &str {
        &self.store_location
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding_service.config().model_name()
    }
}
