//! The per-run pipeline: list entities, fetch metrics, fold, finalize.

use anyhow::{Context, Result};
use tracing::{Instrument, info, info_span, warn};

use crate::platform::FeedbackPlatform;
use crate::summary::{Aggregate, SummaryRow};
use crate::window::ReportWindow;

/// Runs one report against `platform` and returns the full buffered row set:
/// one row per entity in listing order, then the `ALL` aggregate when any
/// entity has feedback.
///
/// Entities are fetched strictly sequentially; the first failed fetch aborts
/// the run with no rows, so a partial summary is never emitted.
pub async fn run_report<P: FeedbackPlatform + ?Sized>(
    platform: &P,
    window: &ReportWindow,
) -> Result<Vec<SummaryRow>> {
    let source = platform.source();
    let run_at = window.run_date();

    let entities = platform
        .list_entities()
        .await
        .with_context(|| format!("{source}: listing entities failed"))?;
    info!(source, entity_count = entities.len(), "Entity list fetched");

    let mut rows = Vec::with_capacity(entities.len() + 1);
    let mut aggregate = Aggregate::default();

    for entity in &entities {
        let span = info_span!("fetch_metrics", source, entity_id = %entity.id);
        let snapshot = platform
            .fetch_metrics(&entity.id, window)
            .instrument(span)
            .await
            .with_context(|| format!("{source}: metrics for entity {} failed", entity.id))?;

        if snapshot.score.is_none() && snapshot.lifetime_count > 0 {
            warn!(
                source,
                entity_id = %entity.id,
                lifetime = snapshot.lifetime_count,
                "Entity has responses but no platform score"
            );
        }

        aggregate = aggregate.fold(&snapshot);
        rows.push(SummaryRow::for_entity(&run_at, source, entity, &snapshot));
    }

    if let Some(all) = aggregate.finalize(&run_at, source) {
        rows.push(all);
    }

    info!(
        source,
        rows = rows.len(),
        weekly_new = aggregate.window_new_total,
        total_feedbacks = aggregate.lifetime_total,
        "Report complete"
    );
    Ok(rows)
}
