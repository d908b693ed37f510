use serde::{Deserialize, Serialize};

/// Number of stored chunks that share one source label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub chunks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub chunks: u64,
    pub sources: Vec<SourceSummary>,
}

/// Outcome of removing every chunk of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReport {
    pub removed: u64,
    pub remaining: u64,
    pub source: String,
}
