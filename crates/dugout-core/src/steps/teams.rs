use dugout_warehouse::{load_rows, Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::{fetch_teams, StepContext};

pub const TABLE: TableSpec = TableSpec::upsert("raw_mlb.raw_teams", &["team_id"]);

pub fn transform_team(team: Record<'_>) -> Option<Row> {
    Some(
        Row::with_capacity(15)
            .with("team_id", team.int("id")?)
            .with("name", team.text("name"))
            .with("team_code", team.text("teamCode"))
            .with("abbreviation", team.text("abbreviation"))
            .with("team_name", team.text("teamName"))
            .with("location_name", team.text("locationName"))
            .with("league_id", team.int("league.id"))
            .with("league_name", team.text("league.name"))
            .with("division_id", team.int("division.id"))
            .with("division_name", team.text("division.name"))
            .with("venue_id", team.int("venue.id"))
            .with("venue_name", team.text("venue.name"))
            .with("sport_id", team.int("sport.id").unwrap_or(1))
            .with("active", team.bool("active").unwrap_or(true))
            .with("first_year_of_play", team.text("firstYearOfPlay")),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(StepName::Teams.as_str())?;

    let teams = fetch_teams(ctx)?;
    let listed = Record::new(&teams).list("teams");
    tracing::info!(teams = listed.len(), "fetched teams");

    let rows = listed
        .into_iter()
        .filter_map(transform_team)
        .collect::<Vec<_>>();
    let count = load_rows(&connection, &TABLE, &rows)?;
    tracing::info!(rows = count, table = TABLE.name, "upserted teams");
    Ok(count)
}
