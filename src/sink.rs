//! Artifact sinks: quality reports, rejected-record logs, and the indicator
//! document. Side files of the pipeline, laid out under the data directory:
//!
//!   data/raw/games_<season>.json                 raw producer batches
//!   data/errors/games_<season>_errors.jsonl      one line per rejected record
//!   data/reports/games_<season>_quality_report.json
//!   data/indicators/indicators.json

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::constants;
use crate::domain::{ErrorRecord, IndicatorSet, QualityReport};
use crate::error::Result;

/// Writes pipeline artifacts under a data directory root.
pub struct ArtifactWriter {
    data_dir: PathBuf,
}

/// Quality report as persisted, keyed by season.
#[derive(Debug, Serialize)]
struct QualityReportDocument<'a> {
    season: i32,
    #[serde(flatten)]
    report: &'a QualityReport,
}

impl ArtifactWriter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn raw_batch_path(&self, season: i32) -> PathBuf {
        self.data_dir
            .join(constants::RAW_SUBDIR)
            .join(format!("games_{}.json", season))
    }

    pub fn clean_dir(&self) -> PathBuf {
        self.data_dir.join(constants::CLEAN_SUBDIR)
    }

    /// Persist one raw season batch exactly as fetched.
    pub fn write_raw_batch(&self, season: i32, records: &[Value]) -> Result<()> {
        let path = self.raw_batch_path(season);
        write_json_pretty(&path, &records)?;
        info!("Wrote {} raw records to {:?}", records.len(), path);
        Ok(())
    }

    /// Load a previously persisted raw season batch.
    pub fn read_raw_batch(&self, season: i32) -> Result<Vec<Value>> {
        let content = fs::read_to_string(self.raw_batch_path(season))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the per-season quality report document
    /// `{season, total, valid_count, errors}`.
    pub fn write_quality_report(&self, season: i32, report: &QualityReport) -> Result<()> {
        let path = self
            .data_dir
            .join(constants::REPORTS_SUBDIR)
            .join(format!("games_{}_quality_report.json", season));
        write_json_pretty(&path, &QualityReportDocument { season, report })?;
        info!("Wrote quality report to {:?}", path);
        Ok(())
    }

    /// Persist rejected records as JSON lines, one error per line.
    pub fn write_error_records(&self, season: i32, errors: &[ErrorRecord]) -> Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        let path = self
            .data_dir
            .join(constants::ERRORS_SUBDIR)
            .join(format!("games_{}_errors.jsonl", season));
        ensure_parent(&path)?;
        let mut file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        for error in errors {
            serde_json::to_writer(&mut file, error)?;
            file.write_all(b"\n")?;
        }
        info!("Wrote {} error records to {:?}", errors.len(), path);
        Ok(())
    }

    /// Replace the indicator document wholesale.
    pub fn write_indicators(&self, indicators: &IndicatorSet) -> Result<()> {
        let path = self
            .data_dir
            .join(constants::INDICATORS_SUBDIR)
            .join("indicators.json");
        write_json_pretty(&path, indicators)?;
        info!("Wrote indicators to {:?}", path);
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationReason;
    use crate::pipeline::{summarize, validate};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn quality_report_document_has_expected_shape() {
        let dir = tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let outcomes = vec![validate(&json!({"id": 1}))];
        let report = summarize(&outcomes);
        writer.write_quality_report(2023, &report).unwrap();

        let content = fs::read_to_string(
            dir.path()
                .join("reports")
                .join("games_2023_quality_report.json"),
        )
        .unwrap();
        let doc: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["season"], json!(2023));
        assert_eq!(doc["total"], json!(1));
        assert_eq!(doc["valid_count"], json!(0));
        assert_eq!(doc["errors"]["missing_required_field"], json!(1));
    }

    #[test]
    fn raw_batches_round_trip() {
        let dir = tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let records = vec![json!({"id": 1}), json!({"id": 2})];
        writer.write_raw_batch(2024, &records).unwrap();
        assert_eq!(writer.read_raw_batch(2024).unwrap(), records);
    }

    #[test]
    fn error_lines_are_appended() {
        let dir = tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let errors = vec![ErrorRecord {
            reason: ValidationReason::SameTeam,
            game_id_hint: Some(9),
            season: Some(2023),
            raw: json!({"id": 9}),
        }];
        writer.write_error_records(2023, &errors).unwrap();
        writer.write_error_records(2023, &errors).unwrap();

        let content =
            fs::read_to_string(dir.path().join("errors").join("games_2023_errors.jsonl")).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
