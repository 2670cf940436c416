//! SQL schema for the projected match database.
//!
//! The projection is rebuilt from scratch on every run, so [`SCHEMA`] drops
//! every table before recreating it. Indexes are created separately, after
//! the bulk load.

/// Every table, parents before children.
pub const TABLES: &[&str] =
  &["teams", "players", "stadiums", "matches", "match_lineups", "goals", "penalties"];

/// Drop-and-create DDL. Children are dropped before their parents.
pub const SCHEMA: &str = "
DROP TABLE IF EXISTS penalties;
DROP TABLE IF EXISTS goals;
DROP TABLE IF EXISTS match_lineups;
DROP TABLE IF EXISTS matches;
DROP TABLE IF EXISTS stadiums;
DROP TABLE IF EXISTS players;
DROP TABLE IF EXISTS teams;

CREATE TABLE teams (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE players (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE stadiums (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL,
    city      TEXT NOT NULL,
    capacity  INTEGER NOT NULL DEFAULT 0,
    UNIQUE (name, city)
);

CREATE TABLE matches (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    url             TEXT NOT NULL UNIQUE,
    text            TEXT NOT NULL,
    time            TEXT,              -- zero-padded HH:MM or NULL
    team1_id        INTEGER NOT NULL REFERENCES teams(id),
    team2_id        INTEGER NOT NULL REFERENCES teams(id),
    home_score      INTEGER NOT NULL,
    away_score      INTEGER NOT NULL,
    stadium_id      INTEGER NOT NULL REFERENCES stadiums(id),
    viewers         INTEGER NOT NULL DEFAULT 0,
    attendance_pct  INTEGER NOT NULL DEFAULT 0
);

-- A player appears at most once per match.
CREATE TABLE match_lineups (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id   INTEGER NOT NULL REFERENCES matches(id),
    team_id    INTEGER NOT NULL REFERENCES teams(id),
    player_id  INTEGER NOT NULL REFERENCES players(id),
    position   TEXT,
    UNIQUE (match_id, player_id)
);

-- One row per goal; a brace is two rows.
CREATE TABLE goals (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id   INTEGER NOT NULL REFERENCES matches(id),
    team_id    INTEGER NOT NULL REFERENCES teams(id),
    player_id  INTEGER NOT NULL REFERENCES players(id)
);

CREATE TABLE penalties (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id   INTEGER NOT NULL REFERENCES matches(id),
    player_id  INTEGER NOT NULL REFERENCES players(id)
);
";

/// Secondary indexes on every foreign-key column, plus kickoff time.
pub const INDEXES: &str = "
CREATE INDEX matches_team1_idx     ON matches(team1_id);
CREATE INDEX matches_team2_idx     ON matches(team2_id);
CREATE INDEX matches_stadium_idx   ON matches(stadium_id);
CREATE INDEX matches_time_idx      ON matches(time);
CREATE INDEX lineups_match_idx     ON match_lineups(match_id);
CREATE INDEX lineups_team_idx      ON match_lineups(team_id);
CREATE INDEX lineups_player_idx    ON match_lineups(player_id);
CREATE INDEX goals_match_idx       ON goals(match_id);
CREATE INDEX goals_team_idx        ON goals(team_id);
CREATE INDEX goals_player_idx      ON goals(player_id);
CREATE INDEX penalties_match_idx   ON penalties(match_id);
CREATE INDEX penalties_player_idx  ON penalties(player_id);
";
