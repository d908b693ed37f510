pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    AnswerQuestionUseCase, ChatClient, DeleteSourceUseCase, EmbeddingService,
    IngestDocumentUseCase, StoreStatsUseCase, VectorRepository, DEFAULT_SOURCE, DEFAULT_TOP_K,
};

pub use connector::api::DEFAULT_STORE_FILE;
pub use connector::{
    AnthropicClient, Container, ContainerConfig, InMemoryVectorRepository, JsonVectorRepository,
    MockChatClient, MockEmbedding, OrtEmbedding, Router,
};

pub use domain::{
    cosine_similarity, ChatAnswer, ChunkRecord, Citation, DeletionReport, DomainError,
    EmbeddingConfig, Retriever, SearchResult, SourceSummary, StoreStats, TextChunker,
    DEFAULT_MAX_CHARS,
};
