//! CSV sink for the run summary.
//!
//! Rows are serialized into memory first and the file is written in one
//! shot, so an aborted run never leaves a half-overwritten summary behind.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::summary::SummaryRow;

/// Which column layout the consumer expects.
///
/// Headers and column order are part of the contract; downstream parses by
/// position and header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSchema {
    /// `run_at, source, scope, weekly_new, total_feedbacks, overall_score`
    /// where `scope` is the entity display name or `ALL`.
    Aggregate,
    /// `run_at, source, entity_id, entity_name, weekly_new, total_feedbacks,
    /// score`, one row per entity plus the `ALL` row.
    Detail,
}

const AGGREGATE_HEADER: [&str; 6] = [
    "run_at",
    "source",
    "scope",
    "weekly_new",
    "total_feedbacks",
    "overall_score",
];
const DETAIL_HEADER: [&str; 7] = [
    "run_at",
    "source",
    "entity_id",
    "entity_name",
    "weekly_new",
    "total_feedbacks",
    "score",
];

#[derive(Serialize)]
struct AggregateRecord<'a> {
    run_at: &'a str,
    source: &'a str,
    scope: &'a str,
    weekly_new: u64,
    total_feedbacks: u64,
    overall_score: Option<f64>,
}

#[derive(Serialize)]
struct DetailRecord<'a> {
    run_at: &'a str,
    source: &'a str,
    entity_id: &'a str,
    entity_name: &'a str,
    weekly_new: u64,
    total_feedbacks: u64,
    score: Option<f64>,
}

/// Renders `rows` under `schema` and replaces the file at `path`.
pub fn write_summary(path: &str, schema: RowSchema, rows: &[SummaryRow]) -> Result<()> {
    let bytes = render_csv(schema, rows)?;
    std::fs::write(path, bytes)?;
    info!(path, rows = rows.len(), "Summary written");
    Ok(())
}

fn render_csv(schema: RowSchema, rows: &[SummaryRow]) -> Result<Vec<u8>> {
    debug!(?schema, rows = rows.len(), "Rendering CSV");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // The header is part of the contract even when the run produced no rows,
    // so it is written up front rather than lazily on the first record.
    match schema {
        RowSchema::Aggregate => writer.write_record(AGGREGATE_HEADER)?,
        RowSchema::Detail => writer.write_record(DETAIL_HEADER)?,
    }

    for row in rows {
        match schema {
            RowSchema::Aggregate => writer.serialize(AggregateRecord {
                run_at: &row.run_at,
                source: &row.source,
                scope: &row.entity_name,
                weekly_new: row.window_new_count,
                total_feedbacks: row.lifetime_count,
                overall_score: row.score,
            })?,
            RowSchema::Detail => writer.serialize(DetailRecord {
                run_at: &row.run_at,
                source: &row.source,
                entity_id: &row.entity_id,
                entity_name: &row.entity_name,
                weekly_new: row.window_new_count,
                total_feedbacks: row.lifetime_count,
                score: row.score,
            })?,
        }
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {e}"))
}

/// Logs the row set as pretty-printed JSON (debug aid behind `--json`).
pub fn print_json(rows: &[SummaryRow]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}
