use std::collections::{HashMap, HashSet};

use paperflow_common::Identified;

use crate::result::AnnotationResult;
use crate::schema::Scored;
use crate::schemas::shorts_score::ShortsScore;

/// Top-K selection over annotated items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRanker {
    pub top_k: usize,
    pub min_score: f64,
}

impl SelectionRanker {
    pub fn new(top_k: usize, min_score: f64) -> Self {
        Self { top_k, min_score }
    }

    /// Successful results scoring at least `min_score`, best first, at most
    /// `top_k`, each joined to its item.
    ///
    /// First occurrence wins for duplicate identifiers on either side. Ties
    /// keep input order. Results whose identifier has no item are dropped.
    pub fn select<'a, I, T>(
        &self,
        items: &'a [I],
        results: &'a [AnnotationResult<T>],
    ) -> Vec<(&'a I, &'a AnnotationResult<T>)>
    where
        I: Identified,
        T: Scored,
    {
        let mut by_id: HashMap<&str, &I> = HashMap::with_capacity(items.len());
        for item in items {
            by_id.entry(item.id()).or_insert(item);
        }

        let mut seen = HashSet::with_capacity(results.len());
        let mut candidates: Vec<(f64, &AnnotationResult<T>)> = results
            .iter()
            .filter(|r| seen.insert(r.paper_id.as_str()))
            .filter_map(|r| r.payload().map(|p| (p.score(), r)))
            .filter(|(score, _)| *score >= self.min_score)
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.truncate(self.top_k);

        candidates
            .into_iter()
            .filter_map(|(_, r)| by_id.get(r.paper_id.as_str()).map(|item| (*item, r)))
            .collect()
    }
}

/// Shorts scores worth producing a video for, in input order.
pub fn filter_by_verdict(
    scores: &[AnnotationResult<ShortsScore>],
    include_mid: bool,
) -> Vec<&AnnotationResult<ShortsScore>> {
    scores
        .iter()
        .filter(|r| r.payload().is_some_and(|s| s.verdict.is_adopted(include_mid)))
        .collect()
}
