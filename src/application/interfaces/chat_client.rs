use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends chat-style prompts to an LLM and returns the text response.
///
/// Any failure must come back as `DomainError::GenerationError`; an empty
/// string is never a substitute for an error.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a `system` instruction followed by a `user` prompt and return
    /// the assistant's response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError>;
}
