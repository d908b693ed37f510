use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk of an ingested document together with its embedding.
///
/// This is the unit persisted in the vector store. Records are only ever
/// created (during ingestion) and removed (by deleting their source); they are
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    id: String,
    text: String,
    source: String,
    embedding: Vec<f32>,
}

impl ChunkRecord {
    /// Create a record with a fresh random id.
    pub fn new(text: impl Into<String>, source: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), text, source, embedding)
    }

    pub fn with_id(
        id: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
            embedding,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.text.chars().take(max_chars).collect();
        if self.text.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}
