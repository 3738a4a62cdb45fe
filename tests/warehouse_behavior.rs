//! Behavior-driven tests for the raw warehouse
//!
//! These tests verify HOW rows land in the raw tables: keyed tables merge on
//! their natural key, the pitch table appends, and a bad batch leaves no trace.

use std::thread;
use std::time::Duration;

use dugout_core::steps::{batting_stats, schedule, statcast, teams};
use dugout_warehouse::{
    load_rows, Row, Warehouse, WarehouseConfig, WarehouseError, RAW_SCHEMA,
};
use tempfile::tempdir;

fn batting_row(player_id: i64, team_id: i64, game_type: &str, hits: i64) -> Row {
    Row::new()
        .with("player_id", player_id)
        .with("season", 2024_i64)
        .with("team_id", team_id)
        .with("league_id", 103_i64)
        .with("game_type", game_type)
        .with("hits", hits)
}

fn pitch(game_pk: i64, pitch_number: i64) -> Row {
    Row::new()
        .with("game_pk", game_pk)
        .with("game_date", "2024-04-01")
        .with("batter", 592450_i64)
        .with("pitcher", 605483_i64)
        .with("pitch_number", pitch_number)
}

fn hits(warehouse: &Warehouse, player_id: i64, team_id: i64) -> i64 {
    let connection = warehouse.connect("reader").expect("connect");
    connection
        .query_row(
            "SELECT hits FROM raw_mlb.raw_batting_stats WHERE player_id = ? AND team_id = ?",
            [player_id, team_id],
            |row| row.get(0),
        )
        .expect("hits")
}

fn loaded_at_us(warehouse: &Warehouse, player_id: i64, team_id: i64) -> i64 {
    let connection = warehouse.connect("reader").expect("connect");
    connection
        .query_row(
            "SELECT epoch_us(loaded_at) FROM raw_mlb.raw_batting_stats \
WHERE player_id = ? AND team_id = ?",
            [player_id, team_id],
            |row| row.get(0),
        )
        .expect("loaded_at")
}

// =============================================================================
// Warehouse: Opening
// =============================================================================

#[test]
fn when_operator_opens_a_file_warehouse_the_raw_schema_exists() {
    // Given: A data directory that does not exist yet
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("data").join("mlb.duckdb");

    // When: The warehouse is opened twice
    Warehouse::open(WarehouseConfig::file(&db_path)).expect("first open");
    let warehouse = Warehouse::open(WarehouseConfig::file(&db_path)).expect("second open");

    // Then: All seven raw tables are present and empty
    let connection = warehouse.connect("reader").expect("connect");
    let tables: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ?",
            [RAW_SCHEMA],
            |row| row.get(0),
        )
        .expect("count tables");
    assert_eq!(tables, 7);
    assert_eq!(warehouse.count_rows(teams::TABLE.name).expect("count"), 0);
}

// =============================================================================
// Warehouse: Upsert
// =============================================================================

#[test]
fn when_a_stat_line_is_reloaded_the_newer_values_replace_the_old() {
    // Given: A batting line for one player
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("batting_stats").expect("connect");
    load_rows(
        &connection,
        &batting_stats::TABLE,
        &[batting_row(592450, 147, "R", 120)],
    )
    .expect("first load");

    // When: The same key arrives with updated totals
    load_rows(
        &connection,
        &batting_stats::TABLE,
        &[batting_row(592450, 147, "R", 180)],
    )
    .expect("second load");

    // Then: One row remains, carrying the latest value
    assert_eq!(warehouse.count_rows(batting_stats::TABLE.name).expect("count"), 1);
    assert_eq!(hits(&warehouse, 592450, 147), 180);
}

#[test]
fn when_a_stat_line_is_reloaded_its_load_time_moves_forward() {
    // Given: A batting line loaded once
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("batting_stats").expect("connect");
    load_rows(
        &connection,
        &batting_stats::TABLE,
        &[batting_row(592450, 147, "R", 120)],
    )
    .expect("first load");
    let first = loaded_at_us(&warehouse, 592450, 147);

    // When: The same key is loaded again a moment later
    thread::sleep(Duration::from_millis(20));
    load_rows(
        &connection,
        &batting_stats::TABLE,
        &[batting_row(592450, 147, "R", 121)],
    )
    .expect("second load");

    // Then: loaded_at was refreshed by the conflict update
    let second = loaded_at_us(&warehouse, 592450, 147);
    assert!(second > first, "loaded_at {second} should be after {first}");
}

#[test]
fn when_a_player_is_traded_mid_season_each_team_keeps_its_own_line() {
    // Given: Two splits for the same player and season
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("batting_stats").expect("connect");

    // When: Both are loaded
    load_rows(
        &connection,
        &batting_stats::TABLE,
        &[
            batting_row(605141, 119, "R", 40),
            batting_row(605141, 135, "R", 75),
        ],
    )
    .expect("load");

    // Then: The team id is part of the key, so both lines survive
    assert_eq!(warehouse.count_rows(batting_stats::TABLE.name).expect("count"), 2);
    assert_eq!(hits(&warehouse, 605141, 119), 40);
    assert_eq!(hits(&warehouse, 605141, 135), 75);
}

#[test]
fn when_a_game_is_rescheduled_it_gets_a_second_schedule_row() {
    // Given: A postponed game and its makeup date
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("schedule").expect("connect");
    let entry = |date: &str, status: &str| {
        Row::new()
            .with("game_pk", 745_100_i64)
            .with("game_date", date)
            .with("status_code", status)
    };

    // When: Both schedule entries load, then load again
    let rows = [entry("2024-04-03", "DR"), entry("2024-04-04", "F")];
    load_rows(&connection, &schedule::TABLE, &rows).expect("load");
    load_rows(&connection, &schedule::TABLE, &rows).expect("reload");

    // Then: (game_pk, game_date) keeps one row per date
    assert_eq!(warehouse.count_rows(schedule::TABLE.name).expect("count"), 2);
}

// =============================================================================
// Warehouse: Append
// =============================================================================

#[test]
fn when_the_same_pitches_load_twice_they_are_stored_twice() {
    // Given: A chunk of pitches
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("statcast").expect("connect");
    let rows = (1..=3).map(|n| pitch(745_001, n)).collect::<Vec<_>>();

    // When: The chunk is appended twice
    load_rows(&connection, &statcast::TABLE, &rows).expect("load");
    load_rows(&connection, &statcast::TABLE, &rows).expect("reload");

    // Then: No deduplication happens and every row got its own surrogate id
    assert_eq!(warehouse.count_rows(statcast::TABLE.name).expect("count"), 6);
    let distinct_ids: i64 = connection
        .query_row(
            "SELECT COUNT(DISTINCT id) FROM raw_mlb.raw_statcast",
            [],
            |row| row.get(0),
        )
        .expect("distinct ids");
    assert_eq!(distinct_ids, 6);
}

// =============================================================================
// Warehouse: Atomicity
// =============================================================================

#[test]
fn when_a_batch_contains_a_bad_row_nothing_from_it_is_kept() {
    // Given: Two good pitches followed by one without a batter
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("statcast").expect("connect");
    let rows = vec![
        pitch(745_001, 1),
        pitch(745_001, 2),
        pitch(745_001, 3).with("batter", None::<i64>),
    ];

    // When: The batch is appended
    let result = load_rows(&connection, &statcast::TABLE, &rows);

    // Then: The load fails and the table is still empty
    assert!(matches!(result, Err(WarehouseError::DuckDb(_))));
    assert_eq!(warehouse.count_rows(statcast::TABLE.name).expect("count"), 0);
}

#[test]
fn when_rows_disagree_on_columns_the_batch_is_rejected() {
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("teams").expect("connect");
    let rows = [
        Row::new().with("team_id", 147_i64).with("name", "Yankees"),
        Row::new().with("team_id", 111_i64),
    ];

    let result = load_rows(&connection, &teams::TABLE, &rows);

    assert!(matches!(result, Err(WarehouseError::InvalidBatch(_))));
    assert_eq!(warehouse.count_rows(teams::TABLE.name).expect("count"), 0);
}

#[test]
fn when_a_batch_is_empty_nothing_is_written() {
    let warehouse = Warehouse::open_in_memory().expect("warehouse");
    let connection = warehouse.connect("games").expect("connect");

    assert_eq!(load_rows(&connection, &teams::TABLE, &[]).expect("load"), 0);
    assert_eq!(warehouse.count_rows(teams::TABLE.name).expect("count"), 0);
}
