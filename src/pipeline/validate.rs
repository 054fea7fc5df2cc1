//! Record Validator: checks one raw producer record against the game schema
//! and domain invariants, producing a tagged outcome. Pure and deterministic;
//! invalidity is a normal result, never an error.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{Game, GameStatus, TeamRef, ValidationOutcome, ValidationReason};

/// Validate a single raw record.
///
/// Schema-phase failures (`MissingRequiredField`, `SchemaError`) always take
/// precedence over domain-phase failures (`SameTeam`, `InvalidRange`); a
/// record failing both is classified by its schema failure.
pub fn validate(raw: &Value) -> ValidationOutcome {
    match check(raw) {
        Ok(game) => ValidationOutcome::Valid(game),
        Err(reason) => ValidationOutcome::Invalid {
            reason,
            raw: raw.clone(),
        },
    }
}

fn check(raw: &Value) -> Result<Game, ValidationReason> {
    if !raw.is_object() {
        return Err(ValidationReason::SchemaError);
    }

    // Schema phase: every required field present and coercible.
    let id = require_int(raw, &["id"])?;
    let season = require_int(raw, &["season"])?;
    let season = i32::try_from(season).map_err(|_| ValidationReason::SchemaError)?;
    let date = require_date(raw, &["date"])?;
    let status = require_status(raw, &["status"])?;
    let home_team = require_team(raw, &["home_team"])?;
    let away_team = require_team(raw, &["away_team", "visitor_team"])?;
    let home_score = optional_int(raw, &["home_score", "home_team_score"])?;
    let away_score = optional_int(raw, &["away_score", "away_team_score", "visitor_team_score"])?;

    // Domain phase: a game cannot be a team playing itself.
    if home_team.id == away_team.id {
        return Err(ValidationReason::SameTeam);
    }

    // Domain phase: scores must be non-negative, and a final game must have both.
    let home_score = coerce_score(home_score)?;
    let away_score = coerce_score(away_score)?;
    if status == GameStatus::Final && (home_score.is_none() || away_score.is_none()) {
        return Err(ValidationReason::InvalidRange);
    }

    Ok(Game {
        id,
        season,
        date,
        home_team,
        away_team,
        home_score,
        away_score,
        status,
    })
}

/// Looks up the first present, non-null value among the accepted key
/// spellings. The producer API and the canonical schema disagree on a few
/// names (`visitor_team` vs `away_team`), so alias chains are accepted the
/// same way on every field.
fn lookup<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| !v.is_null())
}

fn require<'a>(raw: &'a Value, keys: &[&str]) -> Result<&'a Value, ValidationReason> {
    lookup(raw, keys).ok_or(ValidationReason::MissingRequiredField)
}

fn require_int(raw: &Value, keys: &[&str]) -> Result<i64, ValidationReason> {
    require(raw, keys)?
        .as_i64()
        .ok_or(ValidationReason::SchemaError)
}

fn optional_int(raw: &Value, keys: &[&str]) -> Result<Option<i64>, ValidationReason> {
    match lookup(raw, keys) {
        None => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or(ValidationReason::SchemaError),
    }
}

fn require_str<'a>(raw: &'a Value, keys: &[&str]) -> Result<&'a str, ValidationReason> {
    require(raw, keys)?
        .as_str()
        .ok_or(ValidationReason::SchemaError)
}

fn require_date(raw: &Value, keys: &[&str]) -> Result<NaiveDate, ValidationReason> {
    let text = require_str(raw, keys)?;
    // Accept plain ISO dates and datetime strings like "2023-11-04T00:00:00.000Z".
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| ValidationReason::SchemaError)
}

fn require_status(raw: &Value, keys: &[&str]) -> Result<GameStatus, ValidationReason> {
    match require_str(raw, keys)?.to_ascii_lowercase().as_str() {
        "final" => Ok(GameStatus::Final),
        "scheduled" => Ok(GameStatus::Scheduled),
        _ => Err(ValidationReason::SchemaError),
    }
}

fn require_team(raw: &Value, keys: &[&str]) -> Result<TeamRef, ValidationReason> {
    let team = require(raw, keys)?;
    if !team.is_object() {
        return Err(ValidationReason::SchemaError);
    }
    Ok(TeamRef {
        id: require_int(team, &["id"])?,
        name: require_str(team, &["full_name", "name"])?.to_string(),
        abbreviation: require_str(team, &["abbreviation"])?.to_string(),
    })
}

fn coerce_score(score: Option<i64>) -> Result<Option<u32>, ValidationReason> {
    match score {
        None => Ok(None),
        Some(s) => u32::try_from(s)
            .map(Some)
            .map_err(|_| ValidationReason::InvalidRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_game() -> Value {
        json!({
            "id": 2,
            "season": 2023,
            "date": "2023-11-04",
            "status": "Final",
            "home_team": {"id": 1, "name": "TeamA", "abbreviation": "TA"},
            "away_team": {"id": 2, "name": "TeamB", "abbreviation": "TB"},
            "home_score": 110,
            "away_score": 95
        })
    }

    #[test]
    fn accepts_complete_final_game() {
        let outcome = validate(&raw_game());
        match outcome {
            ValidationOutcome::Valid(game) => {
                assert_eq!(game.id, 2);
                assert_eq!(game.season, 2023);
                assert_eq!(game.home_team.name, "TeamA");
                assert_eq!(game.home_score, Some(110));
                assert_eq!(game.status, GameStatus::Final);
            }
            other => panic!("expected valid outcome, got {:?}", other),
        }
    }

    #[test]
    fn is_deterministic() {
        let raw = raw_game();
        assert_eq!(validate(&raw), validate(&raw));

        let mut bad = raw_game();
        bad["home_score"] = json!(-3);
        assert_eq!(validate(&bad), validate(&bad));
    }

    #[test]
    fn rejects_same_team() {
        let mut raw = raw_game();
        raw["away_team"] = raw["home_team"].clone();
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::SameTeam)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn missing_field_is_its_own_reason() {
        let mut raw = raw_game();
        raw.as_object_mut().unwrap().remove("date");
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::MissingRequiredField)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn null_field_counts_as_missing() {
        let mut raw = raw_game();
        raw["season"] = Value::Null;
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::MissingRequiredField)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn uncoercible_field_is_schema_error() {
        let mut raw = raw_game();
        raw["date"] = json!("last tuesday");
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::SchemaError)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }

        let mut raw = raw_game();
        raw["status"] = json!("7:00 pm ET");
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::SchemaError)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn schema_error_beats_domain_error() {
        // Same-team violation and an unparsable date at once: the schema
        // failure wins.
        let mut raw = raw_game();
        raw["away_team"] = raw["home_team"].clone();
        raw["date"] = json!(20231104);
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::SchemaError)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn negative_score_is_invalid_range() {
        let mut raw = raw_game();
        raw["away_score"] = json!(-1);
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::InvalidRange)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn final_game_requires_both_scores() {
        let mut raw = raw_game();
        raw.as_object_mut().unwrap().remove("away_score");
        match validate(&raw) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::InvalidRange)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn scheduled_game_may_omit_scores() {
        let mut raw = raw_game();
        raw["status"] = json!("scheduled");
        let obj = raw.as_object_mut().unwrap();
        obj.remove("home_score");
        obj.remove("away_score");
        assert!(validate(&raw).is_valid());
    }

    #[test]
    fn accepts_producer_key_aliases() {
        let raw = json!({
            "id": 7,
            "season": 2022,
            "date": "2022-12-23T00:00:00.000Z",
            "status": "Final",
            "home_team": {"id": 3, "full_name": "Boston Celtics", "abbreviation": "BOS"},
            "visitor_team": {"id": 4, "full_name": "Miami Heat", "abbreviation": "MIA"},
            "home_team_score": 104,
            "visitor_team_score": 98
        });
        match validate(&raw) {
            ValidationOutcome::Valid(game) => {
                assert_eq!(game.away_team.name, "Miami Heat");
                assert_eq!(game.away_score, Some(98));
                assert_eq!(game.date, NaiveDate::from_ymd_opt(2022, 12, 23).unwrap());
            }
            other => panic!("expected valid outcome, got {:?}", other),
        }
    }

    #[test]
    fn non_object_record_is_schema_error() {
        match validate(&json!([1, 2, 3])) {
            ValidationOutcome::Invalid { reason, .. } => {
                assert_eq!(reason, ValidationReason::SchemaError)
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }
}
