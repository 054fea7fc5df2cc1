//! Row Transformer: projects a validated game into the flat, denormalized
//! row shape the columnar store expects. Purely structural; assumes its
//! precondition (a validated `Game`) and cannot fail.

use crate::domain::{FlatRow, Game};

/// Flatten one validated game into a storage row.
pub fn flatten(game: &Game) -> FlatRow {
    FlatRow {
        game_id: game.id,
        season: game.season,
        date: game.date,
        status: game.status,
        home_team_id: game.home_team.id,
        home_team_name: game.home_team.name.clone(),
        home_team_abbr: game.home_team.abbreviation.clone(),
        home_score: game.home_score,
        away_team_id: game.away_team.id,
        away_team_name: game.away_team.name.clone(),
        away_team_abbr: game.away_team.abbreviation.clone(),
        away_score: game.away_score,
    }
}
