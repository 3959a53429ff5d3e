use crate::search::types::ScoredDoc;
use std::cmp::Ordering;

/// Sums the per-shard contributions of every document.
///
/// Index shards may split the vocabulary by token, so one document can be reported by
/// several shards, each for its own tokens; those partial scores add up. Contributions
/// are summed in (doc id, score) order, never in arrival order, so any permutation of
/// the shard responses gives bit-identical scores.
pub fn merge_partials(partials: &[Vec<ScoredDoc>]) -> Vec<ScoredDoc> {
    let mut contributions: Vec<ScoredDoc> = partials.iter().flatten().copied().collect();
    contributions.sort_by(|a, b| {
        a.doc_id
            .cmp(&b.doc_id)
            .then_with(|| a.score.total_cmp(&b.score))
    });

    let mut merged: Vec<ScoredDoc> = Vec::with_capacity(contributions.len());
    for contribution in contributions {
        match merged.last_mut() {
            Some(last) if last.doc_id == contribution.doc_id => last.score += contribution.score,
            _ => merged.push(contribution),
        }
    }
    merged
}

/// Descending score, ties broken by ascending doc id.
pub fn ranking_order(a: &ScoredDoc, b: &ScoredDoc) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Sorts merged documents into ranking order and keeps the first `top_k`.
pub fn rank(mut merged: Vec<ScoredDoc>, top_k: usize) -> Vec<ScoredDoc> {
    merged.sort_by(ranking_order);
    merged.truncate(top_k);
    merged
}
