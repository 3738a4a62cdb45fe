//! Shared driver for the per-player season stat steps.

use std::collections::HashSet;

use dugout_warehouse::{load_rows, Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::{fetch_person, fetch_roster, fetch_teams, team_refs, StepContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatGroup {
    Hitting,
    Pitching,
}

impl StatGroup {
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Hitting => "hitting",
            Self::Pitching => "pitching",
        }
    }

    /// Person hydrate selecting one season of this group for one game type.
    pub fn hydrate(self, season: i64, game_type: &str) -> String {
        format!(
            "stats(group=[{}],type=[season],season={season},gameType={game_type})",
            self.display_name()
        )
    }
}

/// Identifying keys for a split that the split itself does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitKeys<'a> {
    pub player_id: i64,
    pub season: i64,
    pub game_type: &'a str,
}

impl SplitKeys<'_> {
    /// Start a stat row with the key and league columns. `None` when the
    /// split has no team.
    pub fn begin_row(&self, split: Record<'_>, capacity: usize) -> Option<Row> {
        let team_id = split.int("team.id")?;
        Some(
            Row::with_capacity(capacity)
                .with("player_id", self.player_id)
                .with("season", self.season)
                .with("team_id", team_id)
                .with("league_id", split.int("league.id"))
                .with("game_type", self.game_type),
        )
    }
}

/// Splits of the first stat group named `group` that has any.
pub fn select_splits<'a>(person: Record<'a>, group: StatGroup) -> Vec<Record<'a>> {
    person
        .list("stats")
        .into_iter()
        .filter(|stats| stats.text("group.displayName").as_deref() == Some(group.display_name()))
        .map(|stats| stats.list("splits"))
        .find(|splits| !splits.is_empty())
        .unwrap_or_default()
}

pub type SplitTransform = fn(Record<'_>, &SplitKeys<'_>) -> Option<Row>;

/// Walk every rostered player once, pull one season line per game type and
/// load the resulting rows into `table`.
pub fn extract(
    ctx: &StepContext<'_>,
    step: StepName,
    group: StatGroup,
    table: &TableSpec,
    transform: SplitTransform,
) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(step.as_str())?;
    let season = ctx.season();
    let game_types = &ctx.config.extraction.game_types;

    let teams = team_refs(&fetch_teams(ctx)?);
    tracing::info!(teams = teams.len(), group = group.display_name(), "found teams");

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for team in &teams {
        tracing::info!(team = team.name.as_str(), team_id = team.id, "processing roster");
        for player_id in fetch_roster(ctx, team)? {
            if !seen.insert(player_id) {
                continue;
            }
            for game_type in game_types {
                let hydrate = group.hydrate(season, game_type);
                let Some(person) = fetch_person(ctx, player_id, Some(hydrate))? else {
                    continue;
                };
                let keys = SplitKeys {
                    player_id,
                    season,
                    game_type: game_type.as_str(),
                };
                rows.extend(
                    select_splits(Record::new(&person), group)
                        .into_iter()
                        .filter_map(|split| transform(split, &keys)),
                );
            }
        }
    }
    tracing::info!(rows = rows.len(), group = group.display_name(), "collected stat rows");

    let count = load_rows(&connection, table, &rows)?;
    tracing::info!(rows = count, table = table.name, "upserted season stats");
    Ok(count)
}
