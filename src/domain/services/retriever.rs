use tracing::warn;

use crate::domain::{ChunkRecord, SearchResult};

/// Guards the cosine denominator against zero-length vectors.
pub const SIMILARITY_EPSILON: f32 = 1e-8;

/// Cosine similarity `a·b / (‖a‖‖b‖ + ε)`.
///
/// Callers are expected to pass vectors of equal length; extra trailing
/// components of the longer vector are ignored.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    dot_product / (norm_a * norm_b + SIMILARITY_EPSILON)
}

/// Exhaustive nearest-neighbour search over stored chunk records.
///
/// Every record is scored against the query, so a search costs
/// O(records × dimensions).
pub struct Retriever;

impl Retriever {
    /// Score every record and return the `top_k` best, highest score first.
    ///
    /// Ties keep store order. Records whose embedding length differs from the
    /// query are skipped. A `top_k` of 0 returns nothing.
    pub fn search<I>(query: &[f32], records: I, top_k: usize) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = ChunkRecord>,
    {
        let mut skipped = 0usize;
        let mut scored: Vec<SearchResult> = records
            .into_iter()
            .filter_map(|record| {
                if record.dimensions() != query.len() {
                    skipped += 1;
                    return None;
                }
                let score = cosine_similarity(query, record.embedding());
                Some(SearchResult::new(record, score))
            })
            .collect();

        if skipped > 0 {
            warn!(
                "Skipped {} records whose embedding dimensions differ from the query ({})",
                skipped,
                query.len()
            );
        }

        // sort_by is stable, so equal scores keep their store order.
        scored.sort_by(|a, b| b.score().total_cmp(&a.score()));
        scored.truncate(top_k);
        scored
    }
}
