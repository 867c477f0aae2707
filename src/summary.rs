//! Volume-weighted aggregation of per-entity metrics.

use serde::Serialize;

use crate::platform::{Entity, MetricsSnapshot};

/// Scope marker for the synthesized cross-entity row.
pub const ALL_SCOPE: &str = "ALL";

/// One line of the run summary; either a valid entity or the `ALL` aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub run_at: String,
    pub source: String,
    pub entity_id: String,
    pub entity_name: String,
    pub window_new_count: u64,
    pub lifetime_count: u64,
    pub score: Option<f64>,
}

impl SummaryRow {
    pub fn for_entity(
        run_at: &str,
        source: &str,
        entity: &Entity,
        snapshot: &MetricsSnapshot,
    ) -> Self {
        Self {
            run_at: run_at.to_string(),
            source: source.to_string(),
            entity_id: entity.id.clone(),
            entity_name: entity.name.clone(),
            window_new_count: snapshot.window_new_count,
            lifetime_count: snapshot.lifetime_count,
            score: snapshot.score,
        }
    }
}

/// Running totals folded over every valid entity in a run.
///
/// The weighted sum counts an entity only when it has both a score and
/// responses; a platform that computed no score despite responses (pending
/// moderation and the like) is left out of the mean rather than dragged in
/// as zero.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub window_new_total: u64,
    pub lifetime_total: u64,
    weighted_score_sum: f64,
    any_scored: bool,
}

impl Aggregate {
    pub fn fold(mut self, snapshot: &MetricsSnapshot) -> Self {
        self.window_new_total += snapshot.window_new_count;
        self.lifetime_total += snapshot.lifetime_count;
        if let Some(score) = snapshot.score
            && snapshot.lifetime_count > 0
        {
            self.weighted_score_sum += score * snapshot.lifetime_count as f64;
            self.any_scored = true;
        }
        self
    }

    /// The `ALL` row, or `None` when no entity ever collected feedback.
    ///
    /// The weighted mean is rounded to two decimals here and nowhere else;
    /// per-entity rows keep their platform-reported precision. When volume
    /// exists but no entity carried a score, the row's score stays empty
    /// instead of reading as 0.0.
    pub fn finalize(&self, run_at: &str, source: &str) -> Option<SummaryRow> {
        if self.lifetime_total == 0 {
            return None;
        }
        let score = self.any_scored.then(|| {
            let mean = self.weighted_score_sum / self.lifetime_total as f64;
            (mean * 100.0).round() / 100.0
        });
        Some(SummaryRow {
            run_at: run_at.to_string(),
            source: source.to_string(),
            entity_id: ALL_SCOPE.to_string(),
            entity_name: ALL_SCOPE.to_string(),
            window_new_count: self.window_new_total,
            lifetime_count: self.lifetime_total,
            score,
        })
    }
}
