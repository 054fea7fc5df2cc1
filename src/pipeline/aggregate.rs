//! Indicator Aggregator: one full scan over the accumulated rows producing
//! the three ranked indicators. Treats its input as an unordered set; only
//! completed games (both scores present) contribute, so every ranking covers
//! the same team set and no average is undefined.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;

use crate::domain::{FlatRow, IndicatorSet, TeamRanking};

#[derive(Debug, Default)]
struct TeamAccum {
    name: String,
    points_scored: u64,
    points_allowed: u64,
    games_played: u64,
    wins: u64,
}

impl TeamAccum {
    fn record_game(&mut self, scored: u32, allowed: u32) {
        self.points_scored += u64::from(scored);
        self.points_allowed += u64::from(allowed);
        self.games_played += 1;
        if scored > allowed {
            self.wins += 1;
        }
    }

    fn avg_scored(&self) -> f64 {
        self.points_scored as f64 / self.games_played as f64
    }

    fn avg_allowed(&self) -> f64 {
        self.points_allowed as f64 / self.games_played as f64
    }

    fn win_rate(&self) -> f64 {
        self.wins as f64 / self.games_played as f64
    }
}

/// Compute the full indicator set over the accumulated row set. Empty input
/// yields empty rankings, never an error.
pub fn aggregate(rows: &[FlatRow]) -> IndicatorSet {
    let mut teams: HashMap<i64, TeamAccum> = HashMap::new();

    for row in rows {
        // Scheduled games carry no scores and contribute to no indicator.
        let (home_score, away_score) = match (row.home_score, row.away_score) {
            (Some(h), Some(a)) => (h, a),
            _ => continue,
        };

        let home = teams.entry(row.home_team_id).or_default();
        home.name = row.home_team_name.clone();
        home.record_game(home_score, away_score);

        let away = teams.entry(row.away_team_id).or_default();
        away.name = row.away_team_name.clone();
        away.record_game(away_score, home_score);
    }

    IndicatorSet {
        best_offenses: ranked(&teams, TeamAccum::avg_scored, Direction::Descending),
        best_defenses: ranked(&teams, TeamAccum::avg_allowed, Direction::Ascending),
        win_rankings: ranked(&teams, TeamAccum::win_rate, Direction::Descending),
        generated_at: Utc::now(),
    }
}

enum Direction {
    Ascending,
    Descending,
}

fn ranked(
    teams: &HashMap<i64, TeamAccum>,
    metric: fn(&TeamAccum) -> f64,
    direction: Direction,
) -> Vec<TeamRanking> {
    let mut entries: Vec<TeamRanking> = teams
        .iter()
        .map(|(id, accum)| TeamRanking {
            team_id: *id,
            team_name: accum.name.clone(),
            value: metric(accum),
        })
        .collect();

    // Averages over finite counts are always finite, so partial_cmp cannot
    // actually fail; ties fall through to the id tie-break either way.
    entries.sort_by(|a, b| {
        let by_value = match direction {
            Direction::Descending => b.value.partial_cmp(&a.value),
            Direction::Ascending => a.value.partial_cmp(&b.value),
        };
        by_value
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
    entries
}
