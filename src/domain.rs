//! Domain data shapes shared across pipeline stages and collaborators.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimal team identity carried inside a validated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
}

/// Lifecycle state of a game as reported by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    Final,
}

/// A game record that has passed schema and invariant validation.
/// Only the validator constructs one; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub season: i32,
    pub date: NaiveDate,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    /// Absent while the game is still scheduled.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: GameStatus,
}

/// Closed taxonomy of validation failures. `MissingRequiredField` is tracked
/// separately from `SchemaError`: absent or null keys fall in the former,
/// present-but-uncoercible values in the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    SchemaError,
    MissingRequiredField,
    SameTeam,
    InvalidRange,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::SchemaError => "schema_error",
            ValidationReason::MissingRequiredField => "missing_required_field",
            ValidationReason::SameTeam => "same_team",
            ValidationReason::InvalidRange => "invalid_range",
        }
    }
}

/// Per-record validation result. Invalid records keep the raw payload so the
/// error artifact can preserve what the producer actually sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid(Game),
    Invalid {
        reason: ValidationReason,
        raw: serde_json::Value,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// Batch-level validation summary. Holds one counter per failure reason
/// actually observed; absent reasons are implicitly zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total: u64,
    pub valid_count: u64,
    pub errors: BTreeMap<ValidationReason, u64>,
}

impl QualityReport {
    /// Sum of all error counters.
    pub fn error_count(&self) -> u64 {
        self.errors.values().sum()
    }
}

/// Denormalized, storage-ready projection of a validated game. One row per
/// game; append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub game_id: i64,
    pub season: i32,
    pub date: NaiveDate,
    pub status: GameStatus,
    pub home_team_id: i64,
    pub home_team_name: String,
    pub home_team_abbr: String,
    pub home_score: Option<u32>,
    pub away_team_id: i64,
    pub away_team_name: String,
    pub away_team_abbr: String,
    pub away_score: Option<u32>,
}

/// One entry of a ranked indicator sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRanking {
    pub team_id: i64,
    pub team_name: String,
    pub value: f64,
}

/// Full indicator output, recomputed wholesale on every aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub best_offenses: Vec<TeamRanking>,
    pub best_defenses: Vec<TeamRanking>,
    pub win_rankings: Vec<TeamRanking>,
    pub generated_at: DateTime<Utc>,
}

impl IndicatorSet {
    /// Content equality, ignoring the generation timestamp.
    pub fn same_rankings(&self, other: &IndicatorSet) -> bool {
        self.best_offenses == other.best_offenses
            && self.best_defenses == other.best_defenses
            && self.win_rankings == other.win_rankings
    }
}

/// Error artifact entry for one rejected record, mirroring what lands in the
/// per-season errors file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub reason: ValidationReason,
    pub game_id_hint: Option<i64>,
    pub season: Option<i64>,
    pub raw: serde_json::Value,
}
