use dugout_warehouse::{Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::season_stats::{extract, SplitKeys, StatGroup};
use crate::steps::StepContext;

pub const TABLE: TableSpec = TableSpec::upsert(
    "raw_mlb.raw_pitching_stats",
    &["player_id", "season", "team_id", "game_type"],
);

pub fn transform_pitching_split(split: Record<'_>, keys: &SplitKeys<'_>) -> Option<Row> {
    let row = keys.begin_row(split, 33)?;
    let stat = split.record("stat");
    let int = |path: &str| stat.and_then(|s| s.int(path));
    let float = |path: &str| stat.and_then(|s| s.float(path));

    Some(
        row.with("wins", int("wins"))
            .with("losses", int("losses"))
            .with("era", float("era"))
            .with("games", int("gamesPitched"))
            .with("games_started", int("gamesStarted"))
            .with("games_finished", int("gamesFinished"))
            .with("complete_games", int("completeGames"))
            .with("shutouts", int("shutouts"))
            .with("saves", int("saves"))
            .with("save_opportunities", int("saveOpportunities"))
            .with("holds", int("holds"))
            .with("blown_saves", int("blownSaves"))
            // "180.1" means 180 and one third innings; stored as reported.
            .with("innings_pitched", float("inningsPitched"))
            .with("hits_allowed", int("hits"))
            .with("runs_allowed", int("runs"))
            .with("earned_runs", int("earnedRuns"))
            .with("home_runs_allowed", int("homeRuns"))
            .with("walks", int("baseOnBalls"))
            .with("strikeouts", int("strikeOuts"))
            .with("hit_batsmen", int("hitBatsmen"))
            .with("whip", float("whip"))
            .with("batting_average_against", float("avg"))
            .with("wild_pitches", int("wildPitches"))
            .with("balks", int("balks"))
            .with("strikeout_walk_ratio", float("strikeoutWalkRatio"))
            .with("strikeouts_per_9", float("strikeoutsPer9Inn"))
            .with("walks_per_9", float("walksPer9Inn"))
            .with("hits_per_9", float("hitsPer9Inn")),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    extract(
        ctx,
        StepName::PitchingStats,
        StatGroup::Pitching,
        &TABLE,
        transform_pitching_split,
    )
}

#[cfg(test)]
mod tests {
    use dugout_warehouse::Value;
    use serde_json::json;

    use super::*;

    #[test]
    fn innings_pitched_and_rates_are_floats() {
        let keys = SplitKeys {
            player_id: 543037,
            season: 2024,
            game_type: "R",
        };
        let split = json!({
            "team": { "id": 147 },
            "stat": {
                "wins": 15,
                "era": "2.39",
                "inningsPitched": "190.0",
                "strikeoutWalkRatio": "4.12",
                "whip": "-.--",
                "gamesPitched": 31
            }
        });

        let row = transform_pitching_split(Record::new(&split), &keys).expect("row");

        assert_eq!(row.get("innings_pitched"), Some(&Value::Float(190.0)));
        assert_eq!(row.get("era"), Some(&Value::Float(2.39)));
        assert_eq!(row.get("games"), Some(&Value::Int(31)));
        assert!(row.is_null("whip"));
        assert_eq!(row.len(), 33);
    }
}
