use dugout_warehouse::{load_rows, Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::schedule::{dated_games, fetch_schedule};
use crate::steps::StepContext;

pub const TABLE: TableSpec = TableSpec::upsert("raw_mlb.raw_games", &["game_pk"]);

/// Status codes of completed games.
pub const FINAL_STATUSES: &[&str] = &["F", "FT", "FR", "FO"];

pub fn is_final(game: Record<'_>) -> bool {
    game.text("status.statusCode")
        .is_some_and(|code| FINAL_STATUSES.contains(&code.as_str()))
}

pub fn transform_game(game: Record<'_>, game_date: &str) -> Option<Row> {
    let innings = game
        .count("linescore.innings")
        .filter(|count| *count > 0)
        .and_then(|count| i64::try_from(count).ok())
        .or_else(|| game.int("scheduledInnings"));

    Some(
        Row::with_capacity(25)
            .with("game_pk", game.int("gamePk")?)
            .with("game_type", game.text("gameType"))
            .with("season", game.int("season"))
            .with("game_date", game_date)
            .with("game_datetime", game.text("gameDate"))
            .with("status_code", game.text("status.statusCode"))
            .with("status_detail", game.text("status.detailedState"))
            .with("home_team_id", game.int("teams.home.team.id"))
            .with("away_team_id", game.int("teams.away.team.id"))
            .with("home_score", game.int("teams.home.score"))
            .with("away_score", game.int("teams.away.score"))
            .with("home_wins", game.int("teams.home.leagueRecord.wins"))
            .with("home_losses", game.int("teams.home.leagueRecord.losses"))
            .with("away_wins", game.int("teams.away.leagueRecord.wins"))
            .with("away_losses", game.int("teams.away.leagueRecord.losses"))
            .with("venue_id", game.int("venue.id"))
            .with("venue_name", game.text("venue.name"))
            .with("winning_pitcher_id", game.int("decisions.winner.id"))
            .with("losing_pitcher_id", game.int("decisions.loser.id"))
            .with("save_pitcher_id", game.int("decisions.save.id"))
            .with("innings", innings)
            .with("day_night", game.text("dayNight"))
            .with("series_description", game.text("seriesDescription"))
            .with("series_game_number", game.int("seriesGameNumber"))
            .with("double_header", game.text("doubleHeader")),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(StepName::Games.as_str())?;

    let schedule = fetch_schedule(ctx, "linescore,decisions")?;
    let rows = dated_games(&schedule)
        .into_iter()
        .filter(|(_, game)| is_final(*game))
        .filter_map(|(date, game)| transform_game(game, &date))
        .collect::<Vec<_>>();
    tracing::info!(games = rows.len(), "transformed completed games");

    let count = load_rows(&connection, &TABLE, &rows)?;
    tracing::info!(rows = count, table = TABLE.name, "upserted games");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use dugout_warehouse::Value;
    use serde_json::json;

    use super::*;

    #[test]
    fn only_final_statuses_are_kept() {
        let final_game = json!({ "status": { "statusCode": "F" } });
        let forfeit = json!({ "status": { "statusCode": "FO" } });
        let live = json!({ "status": { "statusCode": "I" } });
        let unknown = json!({});

        assert!(is_final(Record::new(&final_game)));
        assert!(is_final(Record::new(&forfeit)));
        assert!(!is_final(Record::new(&live)));
        assert!(!is_final(Record::new(&unknown)));
    }

    #[test]
    fn innings_come_from_linescore_then_schedule() {
        let extras = json!({
            "gamePk": 1,
            "scheduledInnings": 9,
            "linescore": { "innings": [{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}] },
            "teams": {
                "home": { "score": 5, "leagueRecord": { "wins": 1, "losses": 0 } },
                "away": { "score": 4 }
            },
            "decisions": { "winner": { "id": 10 }, "loser": { "id": 20 } }
        });
        let row = transform_game(Record::new(&extras), "2024-04-01").expect("row");
        assert_eq!(row.get("innings"), Some(&Value::Int(11)));
        assert_eq!(row.get("home_score"), Some(&Value::Int(5)));
        assert_eq!(row.get("winning_pitcher_id"), Some(&Value::Int(10)));
        assert!(row.is_null("save_pitcher_id"));
        assert!(row.is_null("away_wins"));

        let rain_shortened = json!({ "gamePk": 2, "scheduledInnings": 7, "linescore": { "innings": [] } });
        let row = transform_game(Record::new(&rain_shortened), "2024-04-01").expect("row");
        assert_eq!(row.get("innings"), Some(&Value::Int(7)));
    }
}
