//! Quality Reporter: folds a batch of validation outcomes into per-reason
//! counters. Every outcome is classified exactly once, so
//! `valid_count + error counts == total` holds by construction.

use std::collections::BTreeMap;

use crate::domain::{QualityReport, ValidationOutcome};

/// Summarize the full outcome sequence of one ingestion batch.
pub fn summarize(outcomes: &[ValidationOutcome]) -> QualityReport {
    let mut valid_count = 0u64;
    let mut errors = BTreeMap::new();

    for outcome in outcomes {
        match outcome {
            ValidationOutcome::Valid(_) => valid_count += 1,
            ValidationOutcome::Invalid { reason, .. } => {
                *errors.entry(*reason).or_insert(0) += 1;
            }
        }
    }

    QualityReport {
        total: outcomes.len() as u64,
        valid_count,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationReason;
    use crate::pipeline::validate::validate;
    use serde_json::json;

    #[test]
    fn empty_batch_yields_empty_report() {
        let report = summarize(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.valid_count, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn counts_every_outcome_exactly_once() {
        let batch = vec![
            // valid
            json!({
                "id": 1, "season": 2023, "date": "2023-01-10", "status": "final",
                "home_team": {"id": 1, "name": "A", "abbreviation": "A"},
                "away_team": {"id": 2, "name": "B", "abbreviation": "B"},
                "home_score": 100, "away_score": 90
            }),
            // same team
            json!({
                "id": 2, "season": 2023, "date": "2023-01-11", "status": "final",
                "home_team": {"id": 1, "name": "A", "abbreviation": "A"},
                "away_team": {"id": 1, "name": "A", "abbreviation": "A"},
                "home_score": 100, "away_score": 90
            }),
            // missing season
            json!({
                "id": 3, "date": "2023-01-12", "status": "scheduled",
                "home_team": {"id": 1, "name": "A", "abbreviation": "A"},
                "away_team": {"id": 2, "name": "B", "abbreviation": "B"}
            }),
            // negative score
            json!({
                "id": 4, "season": 2023, "date": "2023-01-13", "status": "final",
                "home_team": {"id": 1, "name": "A", "abbreviation": "A"},
                "away_team": {"id": 2, "name": "B", "abbreviation": "B"},
                "home_score": -5, "away_score": 90
            }),
        ];

        let outcomes: Vec<_> = batch.iter().map(validate).collect();
        let report = summarize(&outcomes);

        assert_eq!(report.total, 4);
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.errors.get(&ValidationReason::SameTeam), Some(&1));
        assert_eq!(
            report.errors.get(&ValidationReason::MissingRequiredField),
            Some(&1)
        );
        assert_eq!(report.errors.get(&ValidationReason::InvalidRange), Some(&1));
        assert_eq!(report.valid_count + report.error_count(), report.total);
    }

    #[test]
    fn serializes_reasons_as_snake_case_keys() {
        let outcomes = vec![validate(&json!({"id": "not an int"}))];
        let report = summarize(&outcomes);
        let doc = serde_json::to_value(&report).unwrap();
        assert_eq!(doc["errors"]["schema_error"], json!(1));
    }
}
