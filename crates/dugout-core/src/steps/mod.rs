//! Per-entity extraction steps and the context they share.
//!
//! Every step acquires its own warehouse connection before doing anything
//! else and releases it when `run` returns, successful or not.

pub mod batting_stats;
pub mod games;
pub mod pitching_stats;
pub mod players;
pub mod schedule;
pub mod season_stats;
pub mod statcast;
pub mod teams;

use dugout_warehouse::Warehouse;
use serde_json::Value as Json;

use crate::config::Config;
use crate::data_source::{PitchSource, Resource, SourceError, StatsApi};
use crate::domain::Record;
use crate::orchestrator::{ExtractionStep, StepName};
use crate::retry::{with_retry, RetryPolicy};
use crate::throttling::{with_rate_limit, RateLimiter, Sleeper};

/// Everything a step needs, passed by reference into each action.
pub struct StepContext<'a> {
    pub config: &'a Config,
    pub stats: &'a dyn StatsApi,
    pub pitches: &'a dyn PitchSource,
    pub warehouse: &'a Warehouse,
    pub sleeper: &'a dyn Sleeper,
    pub retry: RetryPolicy,
    pub api_limiter: RateLimiter,
    pub statcast_limiter: RateLimiter,
}

impl<'a> StepContext<'a> {
    pub fn new(
        config: &'a Config,
        stats: &'a dyn StatsApi,
        pitches: &'a dyn PitchSource,
        warehouse: &'a Warehouse,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            config,
            stats,
            pitches,
            warehouse,
            sleeper,
            retry: config.retry.policy(),
            api_limiter: config.rate_limit.api_limiter(),
            statcast_limiter: config.rate_limit.statcast_limiter(),
        }
    }

    /// One remote call under the retry policy.
    pub fn fetch<T, F>(&self, label: &str, operation: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Result<T, SourceError>,
    {
        with_retry(&self.retry, self.sleeper, label, operation)
    }

    /// One remote call inside a tight loop: pause once, then retry as needed.
    pub fn fetch_paced<T, F>(
        &self,
        limiter: &RateLimiter,
        label: &str,
        operation: F,
    ) -> Result<T, SourceError>
    where
        F: FnMut() -> Result<T, SourceError>,
    {
        with_rate_limit(limiter, self.sleeper, || self.fetch(label, operation))
    }

    pub fn season(&self) -> i64 {
        self.config.extraction.season
    }
}

/// Steps in dependency order.
pub fn registry<'a>() -> Vec<ExtractionStep<StepContext<'a>>> {
    vec![
        ExtractionStep::new(StepName::Teams, teams::run),
        ExtractionStep::new(StepName::Players, players::run),
        ExtractionStep::new(StepName::Schedule, schedule::run),
        ExtractionStep::new(StepName::Games, games::run),
        ExtractionStep::new(StepName::BattingStats, batting_stats::run),
        ExtractionStep::new(StepName::PitchingStats, pitching_stats::run),
        ExtractionStep::new(StepName::Statcast, statcast::run),
    ]
}

/// Team identity as listed by the teams resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TeamRef {
    pub id: i64,
    pub name: String,
}

pub(crate) fn fetch_teams(ctx: &StepContext<'_>) -> Result<Json, SourceError> {
    let params = [
        ("sportId", ctx.config.extraction.sport_id.to_string()),
        ("season", ctx.season().to_string()),
    ];
    ctx.fetch("teams", || ctx.stats.get(Resource::Teams, &params))
}

pub(crate) fn team_refs(teams: &Json) -> Vec<TeamRef> {
    Record::new(teams)
        .list("teams")
        .into_iter()
        .filter_map(|team| {
            Some(TeamRef {
                id: team.int("id")?,
                name: team.text("name").unwrap_or_default(),
            })
        })
        .collect()
}

/// Player ids on a team's full-season roster, in API order. Paced.
pub(crate) fn fetch_roster(
    ctx: &StepContext<'_>,
    team: &TeamRef,
) -> Result<Vec<i64>, SourceError> {
    let params = [
        ("teamId", team.id.to_string()),
        ("season", ctx.season().to_string()),
        ("rosterType", String::from("fullSeason")),
    ];
    let label = format!("team_roster {}", team.id);
    let roster = ctx.fetch_paced(&ctx.api_limiter, &label, || {
        ctx.stats.get(Resource::TeamRoster, &params)
    })?;

    Ok(Record::new(&roster)
        .list("roster")
        .into_iter()
        .filter_map(|entry| entry.int("person.id"))
        .collect())
}

/// First entry of a person lookup, optionally hydrated. Paced.
pub(crate) fn fetch_person(
    ctx: &StepContext<'_>,
    person_id: i64,
    hydrate: Option<String>,
) -> Result<Option<Json>, SourceError> {
    let mut params = vec![("personId", person_id.to_string())];
    if let Some(hydrate) = hydrate {
        params.push(("hydrate", hydrate));
    }
    let label = format!("person {person_id}");
    let mut response = ctx.fetch_paced(&ctx.api_limiter, &label, || {
        ctx.stats.get(Resource::Person, &params)
    })?;

    Ok(response
        .get_mut("people")
        .and_then(Json::as_array_mut)
        .filter(|people| !people.is_empty())
        .map(|people| people.swap_remove(0)))
}
