//! Get-or-create entity resolution by natural key.
//!
//! Each function looks the entity up and inserts it on a miss, returning the
//! row id either way. They run on a borrowed connection so the rebuild can
//! call them inside its transaction.

use rusqlite::{Connection, OptionalExtension as _, params};

/// Stand-in name and city for matches whose venue is unknown.
pub const UNKNOWN: &str = "Unknown";

pub fn team(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
  let found = conn
    .prepare_cached("SELECT id FROM teams WHERE name = ?1")?
    .query_row(params![name], |row| row.get(0))
    .optional()?;
  if let Some(id) = found {
    return Ok(id);
  }

  conn
    .prepare_cached("INSERT INTO teams (name) VALUES (?1)")?
    .execute(params![name])?;
  Ok(conn.last_insert_rowid())
}

pub fn player(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
  let found = conn
    .prepare_cached("SELECT id FROM players WHERE name = ?1")?
    .query_row(params![name], |row| row.get(0))
    .optional()?;
  if let Some(id) = found {
    return Ok(id);
  }

  conn
    .prepare_cached("INSERT INTO players (name) VALUES (?1)")?
    .execute(params![name])?;
  Ok(conn.last_insert_rowid())
}

/// Stadiums are keyed by `(name, city)`. Blank parts become [`UNKNOWN`].
/// The capacity of the first sighting wins.
pub fn stadium(
  conn: &Connection,
  name: &str,
  city: &str,
  capacity: u32,
) -> rusqlite::Result<i64> {
  let name = non_blank(name);
  let city = non_blank(city);

  let found = conn
    .prepare_cached("SELECT id FROM stadiums WHERE name = ?1 AND city = ?2")?
    .query_row(params![name, city], |row| row.get(0))
    .optional()?;
  if let Some(id) = found {
    return Ok(id);
  }

  conn
    .prepare_cached("INSERT INTO stadiums (name, city, capacity) VALUES (?1, ?2, ?3)")?
    .execute(params![name, city, capacity])?;
  Ok(conn.last_insert_rowid())
}

fn non_blank(s: &str) -> &str {
  let s = s.trim();
  if s.is_empty() { UNKNOWN } else { s }
}
