use dugout_warehouse::{Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::season_stats::{extract, SplitKeys, StatGroup};
use crate::steps::StepContext;

pub const TABLE: TableSpec = TableSpec::upsert(
    "raw_mlb.raw_batting_stats",
    &["player_id", "season", "team_id", "game_type"],
);

pub fn transform_batting_split(split: Record<'_>, keys: &SplitKeys<'_>) -> Option<Row> {
    let row = keys.begin_row(split, 28)?;
    let stat = split.record("stat");
    let int = |path: &str| stat.and_then(|s| s.int(path));
    let float = |path: &str| stat.and_then(|s| s.float(path));

    Some(
        row.with("games_played", int("gamesPlayed"))
            .with("at_bats", int("atBats"))
            .with("runs", int("runs"))
            .with("hits", int("hits"))
            .with("doubles", int("doubles"))
            .with("triples", int("triples"))
            .with("home_runs", int("homeRuns"))
            .with("rbi", int("rbi"))
            .with("stolen_bases", int("stolenBases"))
            .with("caught_stealing", int("caughtStealing"))
            .with("walks", int("baseOnBalls"))
            .with("strikeouts", int("strikeOuts"))
            .with("batting_average", float("avg"))
            .with("obp", float("obp"))
            .with("slg", float("slg"))
            .with("ops", float("ops"))
            .with("plate_appearances", int("plateAppearances"))
            .with("total_bases", int("totalBases"))
            .with("ground_into_dp", int("groundIntoDoublePlay"))
            .with("hit_by_pitch", int("hitByPitch"))
            .with("sacrifice_bunts", int("sacBunts"))
            .with("sacrifice_flies", int("sacFlies"))
            .with("intentional_walks", int("intentionalWalks")),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    extract(
        ctx,
        StepName::BattingStats,
        StatGroup::Hitting,
        &TABLE,
        transform_batting_split,
    )
}
