//! Pitch-level extraction, one date chunk at a time.
//!
//! The target table has no natural key: re-running an overlapping window
//! appends the same pitches again.

use dugout_warehouse::{load_rows, Row, TableSpec, Value};

use crate::domain::{format_date, ColumnKind, Table};
use crate::error::StepError;
use crate::orchestrator::StepName;
use crate::steps::StepContext;

pub const TABLE: TableSpec = TableSpec::append("raw_mlb.raw_statcast");

/// Export column, destination column, destination type.
pub const COLUMNS: &[(&str, &str, ColumnKind)] = &[
    ("game_pk", "game_pk", ColumnKind::Int),
    ("game_date", "game_date", ColumnKind::Text),
    ("game_year", "game_year", ColumnKind::Int),
    ("batter", "batter", ColumnKind::Int),
    ("pitcher", "pitcher", ColumnKind::Int),
    ("player_name", "batter_name", ColumnKind::Text),
    ("pitcher_name", "pitcher_name", ColumnKind::Text),
    ("events", "events", ColumnKind::Text),
    ("description", "description", ColumnKind::Text),
    ("zone", "zone", ColumnKind::Int),
    ("stand", "stand", ColumnKind::Text),
    ("p_throws", "p_throws", ColumnKind::Text),
    ("home_team", "home_team", ColumnKind::Text),
    ("away_team", "away_team", ColumnKind::Text),
    ("type", "type", ColumnKind::Text),
    ("pitch_type", "pitch_type", ColumnKind::Text),
    ("pitch_name", "pitch_name", ColumnKind::Text),
    ("release_speed", "release_speed", ColumnKind::Float),
    ("release_spin_rate", "release_spin_rate", ColumnKind::Int),
    ("release_extension", "release_extension", ColumnKind::Float),
    ("release_pos_x", "release_pos_x", ColumnKind::Float),
    ("release_pos_z", "release_pos_z", ColumnKind::Float),
    ("pfx_x", "pfx_x", ColumnKind::Float),
    ("pfx_z", "pfx_z", ColumnKind::Float),
    ("plate_x", "plate_x", ColumnKind::Float),
    ("plate_z", "plate_z", ColumnKind::Float),
    ("vx0", "vx0", ColumnKind::Float),
    ("vy0", "vy0", ColumnKind::Float),
    ("vz0", "vz0", ColumnKind::Float),
    ("ax", "ax", ColumnKind::Float),
    ("ay", "ay", ColumnKind::Float),
    ("az", "az", ColumnKind::Float),
    ("sz_top", "sz_top", ColumnKind::Float),
    ("sz_bot", "sz_bot", ColumnKind::Float),
    ("effective_speed", "effective_speed", ColumnKind::Float),
    ("launch_speed", "launch_speed", ColumnKind::Float),
    ("launch_angle", "launch_angle", ColumnKind::Float),
    ("hit_distance_sc", "hit_distance_sc", ColumnKind::Float),
    ("hc_x", "hc_x", ColumnKind::Float),
    ("hc_y", "hc_y", ColumnKind::Float),
    (
        "estimated_ba_using_speedangle",
        "estimated_ba_using_speedangle",
        ColumnKind::Float,
    ),
    (
        "estimated_woba_using_speedangle",
        "estimated_woba_using_speedangle",
        ColumnKind::Float,
    ),
    ("babip_value", "babip_value", ColumnKind::Float),
    ("iso_value", "iso_value", ColumnKind::Float),
    ("launch_speed_angle", "launch_speed_angle", ColumnKind::Int),
    ("at_bat_number", "at_bat_number", ColumnKind::Int),
    ("pitch_number", "pitch_number", ColumnKind::Int),
    ("inning", "inning", ColumnKind::Int),
    ("inning_topbot", "inning_topbot", ColumnKind::Text),
    ("outs_when_up", "outs_when_up", ColumnKind::Int),
    ("balls", "balls", ColumnKind::Int),
    ("strikes", "strikes", ColumnKind::Int),
    ("on_1b", "on_1b", ColumnKind::Int),
    ("on_2b", "on_2b", ColumnKind::Int),
    ("on_3b", "on_3b", ColumnKind::Int),
    (
        "if_fielding_alignment",
        "if_fielding_alignment",
        ColumnKind::Text,
    ),
    (
        "of_fielding_alignment",
        "of_fielding_alignment",
        ColumnKind::Text,
    ),
];

const REQUIRED: &[&str] = &["batter", "pitcher", "game_date"];

/// Project every export row onto the table columns, dropping rows without a
/// batter, pitcher or game date.
pub fn transform_pitches(table: &Table) -> Vec<Row> {
    table
        .rows()
        .filter_map(|pitch| {
            let mut row = Row::with_capacity(COLUMNS.len());
            for &(source, target, kind) in COLUMNS {
                let mut value = kind.project(pitch.get(source));
                if target == "game_date" {
                    value = truncate_date(value);
                }
                row.set(target, value);
            }
            REQUIRED
                .iter()
                .all(|column| !row.is_null(column))
                .then_some(row)
        })
        .collect()
}

fn truncate_date(value: Value) -> Value {
    match value {
        Value::Text(text) => Value::Text(text.chars().take(10).collect()),
        other => other,
    }
}

pub fn run(ctx: &StepContext<'_>) -> Result<usize, StepError> {
    let connection = ctx.warehouse.connect(StepName::Statcast.as_str())?;

    let range = ctx.config.statcast.date_range()?;
    let total = range.chunk_count();
    tracing::info!(
        start = format_date(range.start()).as_str(),
        end = format_date(range.end()).as_str(),
        chunks = total,
        chunk_days = range.chunk_days(),
        "statcast window"
    );

    let mut loaded = 0;
    let mut failed = 0;
    for (index, chunk) in range.chunks().enumerate() {
        tracing::info!(chunk = index + 1, of = total, range = %chunk, "fetching chunk");
        let label = format!("statcast {chunk}");
        let table = match ctx.fetch_paced(&ctx.statcast_limiter, &label, || {
            ctx.pitches.pitches(chunk.start, chunk.end)
        }) {
            Ok(table) => table,
            Err(error) => {
                tracing::error!(range = %chunk, %error, "skipping chunk after failed fetch");
                failed += 1;
                continue;
            }
        };

        if table.is_empty() {
            tracing::info!(range = %chunk, "no pitches in chunk");
            continue;
        }

        let rows = transform_pitches(&table);
        tracing::info!(raw = table.len(), valid = rows.len(), "transformed chunk");
        let count = load_rows(&connection, &TABLE, &rows)?;
        tracing::info!(rows = count, table = TABLE.name, "appended chunk");
        loaded += count;
    }

    if failed > 0 {
        return Err(StepError::ChunksFailed { failed, total });
    }
    tracing::info!(rows = loaded, "statcast extraction complete");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_player_name_to_batter_and_coerces_types() {
        let csv = "\
game_date,batter,pitcher,player_name,zone,release_speed,events,on_1b
2024-04-01 00:00:00,660271,543037,\"Ohtani, Shohei\",5.0,99.1,single,
";
        let table = Table::from_csv(csv).expect("csv");
        let rows = transform_pitches(&table);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row.get("game_date").and_then(Value::as_text), Some("2024-04-01"));
        assert_eq!(row.get("batter_name").and_then(Value::as_text), Some("Ohtani, Shohei"));
        assert_eq!(row.get("zone"), Some(&Value::Int(5)));
        assert_eq!(row.get("release_speed"), Some(&Value::Float(99.1)));
        assert!(row.is_null("pitcher_name"));
        assert!(row.is_null("on_1b"));
    }

    #[test]
    fn rows_missing_required_fields_are_dropped() {
        let csv = "\
game_date,batter,pitcher
2024-04-01,1,2
2024-04-01,,2
,1,2
2024-04-02,3,NA
";
        let table = Table::from_csv(csv).expect("csv");
        let rows = transform_pitches(&table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("batter"), Some(&Value::Int(1)));
    }
}
