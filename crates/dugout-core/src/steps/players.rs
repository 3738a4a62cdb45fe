use std::collections::HashSet;

use dugout_warehouse::{load_rows, Row, TableSpec};

use crate::domain::Record;
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::{fetch_person, fetch_roster, fetch_teams, team_refs, StepContext};

pub const TABLE: TableSpec = TableSpec::upsert("raw_mlb.raw_players", &["player_id"]);

/// `roster_team_id` stands in when the person has no current team.
pub fn transform_player(person: Record<'_>, roster_team_id: i64) -> Option<Row> {
    let current_team_id = person
        .int("currentTeam.id")
        .filter(|id| *id != 0)
        .unwrap_or(roster_team_id);

    Some(
        Row::with_capacity(18)
            .with("player_id", person.int("id")?)
            .with("full_name", person.text("fullName").unwrap_or_default())
            .with("first_name", person.text("firstName"))
            .with("last_name", person.text("lastName"))
            .with("primary_number", person.text("primaryNumber"))
            .with("birth_date", person.text("birthDate"))
            .with("birth_city", person.text("birthCity"))
            .with("birth_country", person.text("birthCountry"))
            .with("height", person.text("height"))
            .with("weight", person.int("weight"))
            .with("primary_position_code", person.text("primaryPosition.code"))
            .with("primary_position_name", person.text("primaryPosition.name"))
            .with("primary_position_type", person.text("primaryPosition.type"))
            .with("bat_side", person.text("batSide.code"))
            .with("pitch_hand", person.text("pitchHand.code"))
            .with("current_team_id", current_team_id)
            .with("mlb_debut_date", person.text("mlbDebutDate"))
            .with("active", person.bool("active").unwrap_or(true)),
    )
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(StepName::Players.as_str())?;

    let teams = team_refs(&fetch_teams(ctx)?);
    tracing::info!(teams = teams.len(), "found teams");

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for team in &teams {
        tracing::info!(team = team.name.as_str(), team_id = team.id, "fetching roster");
        let roster = fetch_roster(ctx, team)?;
        tracing::info!(players = roster.len(), "found players on roster");

        for player_id in roster {
            if !seen.insert(player_id) {
                continue;
            }
            if let Some(person) = fetch_person(ctx, player_id, None)? {
                rows.extend(transform_player(Record::new(&person), team.id));
            }
        }
    }
    tracing::info!(players = rows.len(), "fetched unique players");

    let count = load_rows(&connection, &TABLE, &rows)?;
    tracing::info!(rows = count, table = TABLE.name, "upserted players");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use dugout_warehouse::Value;
    use serde_json::json;

    use super::*;

    #[test]
    fn falls_back_to_roster_team_and_defaults_name() {
        let person = json!({
            "id": 592450,
            "primaryPosition": { "code": "9", "name": "Outfielder", "type": "Outfielder" },
            "batSide": { "code": "R" },
            "weight": 282
        });

        let row = transform_player(Record::new(&person), 147).expect("row");

        assert_eq!(row.get("current_team_id"), Some(&Value::Int(147)));
        assert_eq!(row.get("full_name").and_then(Value::as_text), Some(""));
        assert_eq!(row.get("active"), Some(&Value::Bool(true)));
        assert_eq!(row.get("weight"), Some(&Value::Int(282)));
        assert_eq!(row.get("primary_position_code").and_then(Value::as_text), Some("9"));
        assert!(row.is_null("pitch_hand"));
    }

    #[test]
    fn current_team_wins_over_roster_team() {
        let person = json!({ "id": 1, "fullName": "A Player", "currentTeam": { "id": 121 } });
        let row = transform_player(Record::new(&person), 147).expect("row");
        assert_eq!(row.get("current_team_id"), Some(&Value::Int(121)));
    }

    #[test]
    fn person_without_id_is_dropped() {
        let person = json!({ "fullName": "Nobody" });
        assert!(transform_player(Record::new(&person), 147).is_none());
    }
}
