use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_raw_api_tables",
        sql: r#"
CREATE SCHEMA IF NOT EXISTS raw_mlb;

CREATE TABLE IF NOT EXISTS raw_mlb.raw_teams (
    team_id BIGINT PRIMARY KEY,
    name TEXT,
    team_code TEXT,
    abbreviation TEXT,
    team_name TEXT,
    location_name TEXT,
    league_id BIGINT,
    league_name TEXT,
    division_id BIGINT,
    division_name TEXT,
    venue_id BIGINT,
    venue_name TEXT,
    sport_id BIGINT,
    active BOOLEAN,
    first_year_of_play TEXT,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS raw_mlb.raw_players (
    player_id BIGINT PRIMARY KEY,
    full_name TEXT,
    first_name TEXT,
    last_name TEXT,
    primary_number TEXT,
    birth_date TEXT,
    birth_city TEXT,
    birth_country TEXT,
    height TEXT,
    weight BIGINT,
    primary_position_code TEXT,
    primary_position_name TEXT,
    primary_position_type TEXT,
    bat_side TEXT,
    pitch_hand TEXT,
    current_team_id BIGINT,
    mlb_debut_date TEXT,
    active BOOLEAN,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS raw_mlb.raw_schedule (
    game_pk BIGINT NOT NULL,
    game_date TEXT NOT NULL,
    game_type TEXT,
    season BIGINT,
    status_code TEXT,
    status_detail TEXT,
    home_team_id BIGINT,
    home_team_name TEXT,
    away_team_id BIGINT,
    away_team_name TEXT,
    venue_id BIGINT,
    venue_name TEXT,
    game_datetime TEXT,
    day_night TEXT,
    series_description TEXT,
    series_game_number BIGINT,
    games_in_series BIGINT,
    double_header TEXT,
    scheduled_innings BIGINT,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY(game_pk, game_date)
);

CREATE TABLE IF NOT EXISTS raw_mlb.raw_games (
    game_pk BIGINT PRIMARY KEY,
    game_type TEXT,
    season BIGINT,
    game_date TEXT,
    game_datetime TEXT,
    status_code TEXT,
    status_detail TEXT,
    home_team_id BIGINT,
    away_team_id BIGINT,
    home_score BIGINT,
    away_score BIGINT,
    home_wins BIGINT,
    home_losses BIGINT,
    away_wins BIGINT,
    away_losses BIGINT,
    venue_id BIGINT,
    venue_name TEXT,
    winning_pitcher_id BIGINT,
    losing_pitcher_id BIGINT,
    save_pitcher_id BIGINT,
    innings BIGINT,
    day_night TEXT,
    series_description TEXT,
    series_game_number BIGINT,
    double_header TEXT,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    },
    Migration {
        version: "0002_raw_season_stats",
        sql: r#"
CREATE TABLE IF NOT EXISTS raw_mlb.raw_batting_stats (
    player_id BIGINT NOT NULL,
    season BIGINT NOT NULL,
    team_id BIGINT NOT NULL,
    league_id BIGINT,
    game_type TEXT NOT NULL,
    games_played BIGINT,
    at_bats BIGINT,
    runs BIGINT,
    hits BIGINT,
    doubles BIGINT,
    triples BIGINT,
    home_runs BIGINT,
    rbi BIGINT,
    stolen_bases BIGINT,
    caught_stealing BIGINT,
    walks BIGINT,
    strikeouts BIGINT,
    batting_average DOUBLE,
    obp DOUBLE,
    slg DOUBLE,
    ops DOUBLE,
    plate_appearances BIGINT,
    total_bases BIGINT,
    ground_into_dp BIGINT,
    hit_by_pitch BIGINT,
    sacrifice_bunts BIGINT,
    sacrifice_flies BIGINT,
    intentional_walks BIGINT,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY(player_id, season, team_id, game_type)
);

CREATE TABLE IF NOT EXISTS raw_mlb.raw_pitching_stats (
    player_id BIGINT NOT NULL,
    season BIGINT NOT NULL,
    team_id BIGINT NOT NULL,
    league_id BIGINT,
    game_type TEXT NOT NULL,
    wins BIGINT,
    losses BIGINT,
    era DOUBLE,
    games BIGINT,
    games_started BIGINT,
    games_finished BIGINT,
    complete_games BIGINT,
    shutouts BIGINT,
    saves BIGINT,
    save_opportunities BIGINT,
    holds BIGINT,
    blown_saves BIGINT,
    innings_pitched DOUBLE,
    hits_allowed BIGINT,
    runs_allowed BIGINT,
    earned_runs BIGINT,
    home_runs_allowed BIGINT,
    walks BIGINT,
    strikeouts BIGINT,
    hit_batsmen BIGINT,
    whip DOUBLE,
    batting_average_against DOUBLE,
    wild_pitches BIGINT,
    balks BIGINT,
    strikeout_walk_ratio DOUBLE,
    strikeouts_per_9 DOUBLE,
    walks_per_9 DOUBLE,
    hits_per_9 DOUBLE,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY(player_id, season, team_id, game_type)
);
"#,
    },
    Migration {
        version: "0003_raw_statcast",
        sql: r#"
CREATE SEQUENCE IF NOT EXISTS raw_mlb.raw_statcast_id_seq START 1;

CREATE TABLE IF NOT EXISTS raw_mlb.raw_statcast (
    id BIGINT DEFAULT nextval('raw_mlb.raw_statcast_id_seq') PRIMARY KEY,
    game_pk BIGINT,
    game_date TEXT NOT NULL,
    game_year BIGINT,
    batter BIGINT NOT NULL,
    pitcher BIGINT NOT NULL,
    batter_name TEXT,
    pitcher_name TEXT,
    events TEXT,
    description TEXT,
    zone BIGINT,
    stand TEXT,
    p_throws TEXT,
    home_team TEXT,
    away_team TEXT,
    type TEXT,
    pitch_type TEXT,
    pitch_name TEXT,
    release_speed DOUBLE,
    release_spin_rate BIGINT,
    release_extension DOUBLE,
    release_pos_x DOUBLE,
    release_pos_z DOUBLE,
    pfx_x DOUBLE,
    pfx_z DOUBLE,
    plate_x DOUBLE,
    plate_z DOUBLE,
    vx0 DOUBLE,
    vy0 DOUBLE,
    vz0 DOUBLE,
    ax DOUBLE,
    ay DOUBLE,
    az DOUBLE,
    sz_top DOUBLE,
    sz_bot DOUBLE,
    effective_speed DOUBLE,
    launch_speed DOUBLE,
    launch_angle DOUBLE,
    hit_distance_sc DOUBLE,
    hc_x DOUBLE,
    hc_y DOUBLE,
    estimated_ba_using_speedangle DOUBLE,
    estimated_woba_using_speedangle DOUBLE,
    babip_value DOUBLE,
    iso_value DOUBLE,
    launch_speed_angle BIGINT,
    at_bat_number BIGINT,
    pitch_number BIGINT,
    inning BIGINT,
    inning_topbot TEXT,
    outs_when_up BIGINT,
    balls BIGINT,
    strikes BIGINT,
    on_1b BIGINT,
    on_2b BIGINT,
    on_3b BIGINT,
    if_fielding_alignment TEXT,
    of_fielding_alignment TEXT,
    loaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    },
    Migration {
        version: "0004_statcast_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_raw_statcast_game_date ON raw_mlb.raw_statcast(game_date);
CREATE INDEX IF NOT EXISTS idx_raw_statcast_pitcher ON raw_mlb.raw_statcast(pitcher);
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            [migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            tracing::debug!(version = migration.version, "applying migration");
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [migration.version],
            )?;
        }
    }

    Ok(())
}
