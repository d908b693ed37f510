//! Rules shared by every vector store backend for mutating the ordered
//! collection of chunk records.

use std::collections::HashSet;

use crate::domain::{ChunkRecord, DeletionReport, DomainError, SourceSummary};

/// Check that `incoming` may be appended to `existing`.
///
/// Every record needs non-empty text and an embedding whose length matches
/// the store (the first existing record, or else the first incoming one).
/// Ids must be unique across the whole store.
pub fn validate_append(
    existing: &[ChunkRecord],
    incoming: &[ChunkRecord],
) -> Result<(), DomainError> {
    let expected_dimensions = existing
        .first()
        .or_else(|| incoming.first())
        .map(ChunkRecord::dimensions)
        .unwrap_or(0);

    let mut ids: HashSet<&str> = existing.iter().map(ChunkRecord::id).collect();

    for record in incoming {
        if record.text().trim().is_empty() {
            return Err(DomainError::invalid_input(format!(
                "Chunk {} has empty text",
                record.id()
            )));
        }

        if record.dimensions() == 0 || record.dimensions() != expected_dimensions {
            return Err(DomainError::invalid_input(format!(
                "Chunk {} has {} embedding dimensions, store expects {}",
                record.id(),
                record.dimensions(),
                expected_dimensions
            )));
        }

        if !ids.insert(record.id()) {
            return Err(DomainError::already_exists(format!(
                "Chunk id {} is already stored",
                record.id()
            )));
        }
    }

    Ok(())
}

/// Remove every record whose source equals `source` and report the counts.
///
/// Fails with `NotFound` (leaving `records` untouched) when nothing matched.
pub fn remove_source(
    records: &mut Vec<ChunkRecord>,
    source: &str,
) -> Result<DeletionReport, DomainError> {
    let before = records.len();
    records.retain(|record| record.source() != source);
    let removed = before - records.len();

    if removed == 0 {
        return Err(DomainError::not_found(format!(
            "No chunks found for source: {}",
            source
        )));
    }

    Ok(DeletionReport {
        removed: removed as u64,
        remaining: records.len() as u64,
        source: source.to_string(),
    })
}

/// Per-source chunk counts, in order of first appearance.
pub fn summarize_sources(records: &[ChunkRecord]) -> Vec<SourceSummary> {
    let mut summaries: Vec<SourceSummary> = Vec::new();

    for record in records {
        match summaries.iter_mut().find(|s| s.source == record.source()) {
            Some(summary) => summary.chunks += 1,
            None => summaries.push(SourceSummary {
                source: record.source().to_string(),
                chunks: 1,
            }),
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, source: &str) -> ChunkRecord {
        ChunkRecord::with_id(id, format!("text {}", id), source, vec![1.0, 0.0, 0.0])
    }

    #[test]
    fn test_validate_accepts_matching_batch() {
        let existing = vec![record("a", "s1")];
        let incoming = vec![record("b", "s1"), record("c", "s2")];

        assert!(validate_append(&existing, &incoming).is_ok());
    }

    #[test]
    fn test_validate_rejects_dimension_mismatch() {
        let existing = vec![record("a", "s1")];
        let incoming = vec![ChunkRecord::with_id("b", "text", "s1", vec![1.0])];

        let err = validate_append(&existing, &incoming).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_mixed_dimensions_in_first_batch() {
        let incoming = vec![
            record("a", "s1"),
            ChunkRecord::with_id("b", "text", "s1", vec![1.0, 0.0]),
        ];

        assert!(validate_append(&[], &incoming).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let incoming = vec![ChunkRecord::with_id("a", "   ", "s1", vec![1.0])];

        assert!(validate_append(&[], &incoming).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let existing = vec![record("a", "s1")];

        let err = validate_append(&existing, &[record("a", "s2")]).unwrap_err();
        assert!(err.is_already_exists());

        let err = validate_append(&[], &[record("b", "s1"), record("b", "s1")]).unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_remove_source_removes_only_matching_records() {
        let mut records = vec![
            record("a", "keep"),
            record("b", "drop"),
            record("c", "keep"),
            record("d", "drop"),
        ];

        let report = remove_source(&mut records, "drop").unwrap();

        assert_eq!(report.removed, 2);
        assert_eq!(report.remaining, 2);
        assert_eq!(report.source, "drop");
        let ids: Vec<&str> = records.iter().map(ChunkRecord::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_absent_source_is_not_found() {
        let mut records = vec![record("a", "keep")];

        let err = remove_source(&mut records, "missing").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_summarize_sources_keeps_first_seen_order() {
        let records = vec![
            record("a", "beta"),
            record("b", "alpha"),
            record("c", "beta"),
        ];

        let summaries = summarize_sources(&records);

        assert_eq!(
            summaries,
            vec![
                SourceSummary {
                    source: "beta".to_string(),
                    chunks: 2
                },
                SourceSummary {
                    source: "alpha".to_string(),
                    chunks: 1
                },
            ]
        );
    }
}
