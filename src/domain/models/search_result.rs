use serde::{Deserialize, Serialize};

use super::ChunkRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    record: ChunkRecord,
    score: f32,
}

impl SearchResult {
    pub fn new(record: ChunkRecord, score: f32) -> Self {
        Self { record, score }
    }

    pub fn record(&self) -> &ChunkRecord {
        &self.record
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn is_relevant(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    pub fn display_line(&self) -> String {
        format!(
            "{} [{}] (score: {:.3})",
            self.record.id(),
            self.record.source(),
            self.score
        )
    }
}

/// A retrieved chunk as reported back to callers, without its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub text: String,
    pub source: String,
    pub score: f32,
}

impl From<&SearchResult> for Citation {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.record().id().to_string(),
            text: result.record().text().to_string(),
            source: result.record().source().to_string(),
            score: result.score(),
        }
    }
}

/// A generated answer along with the chunks it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub chunks: Vec<Citation>,
}

impl ChatAnswer {
    pub fn new(answer: String, chunks: Vec<Citation>) -> Self {
        Self { answer, chunks }
    }
}
