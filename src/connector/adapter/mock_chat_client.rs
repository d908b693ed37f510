use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::DomainError;

/// Offline stand-in for an LLM (`--mock-llm`).
///
/// Replies with the top-ranked context passage, which is enough to exercise
/// the full question-answering path without network access.
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        debug!("Mock completion for {} char prompt", user.len());

        let best = user
            .lines()
            .find_map(|line| line.strip_prefix("[1] "))
            .map(str::trim);

        Ok(match best {
            Some(passage) => format!("Based on the indexed documents: {}", passage),
            None => "I don't know.".to_string(),
        })
    }
}
