//! Ranking and score spread for model-comparison runs.

use crate::types::{CompareResult, ModelResult};
use std::cmp::Ordering;

/// One entry of a ranked comparison, borrowed from the result map.
#[derive(Debug, Clone, Copy)]
pub struct RankedModel<'a> {
    /// Zero-based position after ranking.
    pub rank: usize,
    pub id: &'a str,
    pub result: &'a ModelResult,
}

impl RankedModel<'_> {
    /// Whether this entry is the overall best (first and successful).
    pub fn is_best(&self) -> bool {
        self.rank == 0 && self.result.is_success()
    }
}

/// Successful results first, then descending score.
fn display_order(a: &ModelResult, b: &ModelResult) -> Ordering {
    match (a.score(), b.score()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl CompareResult {
    /// Model results in display order.
    ///
    /// The sort is stable, so equal scores (and all failures) keep the order
    /// the service returned them in.
    pub fn ranked(&self) -> Vec<RankedModel<'_>> {
        let mut entries: Vec<(&String, &ModelResult)> = self.model_results.iter().collect();
        entries.sort_by(|(_, a), (_, b)| display_order(a, b));
        entries
            .into_iter()
            .enumerate()
            .map(|(rank, (id, result))| RankedModel {
                rank,
                id: id.as_str(),
                result,
            })
            .collect()
    }

    /// Highest-scoring successful model, if any succeeded.
    pub fn best(&self) -> Option<RankedModel<'_>> {
        self.ranked().into_iter().next().filter(|m| m.is_best())
    }

    pub fn success_count(&self) -> usize {
        self.model_results.values().filter(|r| r.is_success()).count()
    }

    /// `max - min` over successful scores; `None` when nothing succeeded.
    pub fn score_spread(&self) -> Option<f64> {
        let (min, max) = self
            .model_results
            .values()
            .filter_map(ModelResult::score)
            .fold(None, |acc: Option<(f64, f64)>, s| match acc {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })?;
        Some(max - min)
    }
}
