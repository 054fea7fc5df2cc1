//! Batch orchestration over the pure pipeline stages: validate each raw
//! record, fork valid/invalid streams, summarize the batch, and flatten the
//! survivors. A bad record is isolated into the error stream and never
//! aborts the batch.

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{ErrorRecord, FlatRow, QualityReport, ValidationOutcome};
use crate::observability::metrics;
use crate::pipeline::{flatten, report, validate};

/// Everything one season batch produces on its way through the core.
#[derive(Debug)]
pub struct BatchResult {
    pub season: i32,
    pub report: QualityReport,
    pub rows: Vec<FlatRow>,
    pub errors: Vec<ErrorRecord>,
}

/// Run one raw batch through validate → summarize → flatten.
pub fn process_batch(season: i32, records: &[Value]) -> BatchResult {
    let start = std::time::Instant::now();

    let outcomes: Vec<ValidationOutcome> = records.iter().map(validate::validate).collect();
    let batch_report = report::summarize(&outcomes);

    let mut rows = Vec::with_capacity(batch_report.valid_count as usize);
    let mut errors = Vec::new();

    for outcome in outcomes {
        match outcome {
            ValidationOutcome::Valid(game) => {
                metrics::validator::record_valid();
                rows.push(flatten::flatten(&game));
            }
            ValidationOutcome::Invalid { reason, raw } => {
                metrics::validator::record_invalid(reason);
                debug!(reason = reason.as_str(), "record rejected");
                errors.push(ErrorRecord {
                    reason,
                    game_id_hint: raw.get("id").and_then(|v| v.as_i64()),
                    season: raw.get("season").and_then(|v| v.as_i64()),
                    raw,
                });
            }
        }
    }

    metrics::runner::record_batch(records.len(), start.elapsed().as_secs_f64());
    info!(
        season,
        total = batch_report.total,
        valid = batch_report.valid_count,
        invalid = batch_report.error_count(),
        "batch processed"
    );

    BatchResult {
        season,
        report: batch_report,
        rows,
        errors,
    }
}
