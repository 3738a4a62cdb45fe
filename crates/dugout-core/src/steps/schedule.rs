use dugout_warehouse::{load_rows, Row, TableSpec};
use serde_json::Value as Json;

use crate::data_source::{Resource, SourceError};
use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::StepContext;

pub const TABLE: TableSpec = TableSpec::upsert("raw_mlb.raw_schedule", &["game_pk", "game_date"]);

/// Season schedule for the configured game types.
pub(crate) fn fetch_schedule(ctx: &StepContext<'_>, hydrate: &str) -> Result<Json, SourceError> {
    let extraction = &ctx.config.extraction;
    let params = [
        ("sportId", extraction.sport_id.to_string()),
        ("season", extraction.season.to_string()),
        ("gameTypes", extraction.game_types.join(",")),
        ("hydrate", hydrate.to_owned()),
    ];
    ctx.fetch("schedule", || ctx.stats.get(Resource::Schedule, &params))
}

/// Games paired with the date of the schedule entry that lists them.
pub(crate) fn dated_games(schedule: &Json) -> Vec<(String, Record<'_>)> {
    Record::new(schedule)
        .list("dates")
        .into_iter()
        .filter_map(|entry| Some((entry.text("date")?, entry.list("games"))))
        .flat_map(|(date, games)| games.into_iter().map(move |game| (date.clone(), game)))
        .collect()
}

pub fn transform_schedule_game(game: Record<'_>, game_date: &str) -> Option<Row> {
    Some(
        Row::with_capacity(19)
            .with("game_pk", game.int("gamePk")?)
            .with("game_date", game_date)
            .with("game_type", game.text("gameType"))
            .with("season", game.int("season"))
            .with("status_code", game.text("status.statusCode"))
            .with("status_detail", game.text("status.detailedState"))
            .with("home_team_id", game.int("teams.home.team.id"))
            .with("home_team_name", game.text("teams.home.team.name"))
            .with("away_team_id", game.int("teams.away.team.id"))
            .with("away_team_name", game.text("teams.away.team.name"))
            .with("venue_id", game.int("venue.id"))
            .with("venue_name", game.text("venue.name"))
            .with("game_datetime", game.text("gameDate"))
            .with("day_night", game.text("dayNight"))
            .with("series_description", game.text("seriesDescription"))
            .with("series_game_number", game.int("seriesGameNumber"))
            .with("games_in_series", game.int("gamesInSeries"))
            .with("double_header", game.text("doubleHeader"))
            .with("scheduled_innings", game.int("scheduledInnings").unwrap_or(9)),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(StepName::Schedule.as_str())?;

    let schedule = fetch_schedule(ctx, "linescore")?;
    tracing::info!(
        dates = Record::new(&schedule).count("dates").unwrap_or(0),
        "fetched schedule dates"
    );

    let rows = dated_games(&schedule)
        .into_iter()
        .filter_map(|(date, game)| transform_schedule_game(game, &date))
        .collect::<Vec<_>>();
    tracing::info!(entries = rows.len(), "transformed schedule entries");

    let count = load_rows(&connection, &TABLE, &rows)?;
    tracing::info!(rows = count, table = TABLE.name, "upserted schedule entries");
    Ok(count)
}
