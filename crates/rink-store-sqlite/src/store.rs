//! [`SqliteStore`]: connection handling and the full rebuild.

use std::path::Path;

use chrono::NaiveTime;
use rink_core::{document::StoreDocument, record::MatchRecord};
use rusqlite::{Connection, Savepoint, params};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  Result, resolve,
  schema::{INDEXES, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A projected match database backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

/// What one [`SqliteStore::rebuild`] loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebuildStats {
  /// Records in the source document.
  pub total:         usize,
  /// Records that produced a match row.
  pub processed:     usize,
  /// Records skipped because a team name was blank.
  pub skipped:       usize,
  /// Records rolled back because a statement failed.
  pub failed:        usize,
  pub lineup_rows:   usize,
  pub goal_rows:     usize,
  pub penalty_rows:  usize,
  /// Lineup, goal and penalty entries dropped for a blank player name.
  pub dropped_facts: usize,
  /// Lineup, goal and penalty entries rolled back because a statement failed.
  pub failed_facts:  usize,
}

#[derive(Debug, Default)]
struct FactCounts {
  lineups:   usize,
  goals:     usize,
  penalties: usize,
  dropped:   usize,
  failed:    usize,
}

impl RebuildStats {
  fn absorb(&mut self, facts: FactCounts) {
    self.processed += 1;
    self.lineup_rows += facts.lineups;
    self.goal_rows += facts.goals;
    self.penalty_rows += facts.penalties;
    self.dropped_facts += facts.dropped;
    self.failed_facts += facts.failed;
  }
}

impl SqliteStore {
  /// Open (or create) a database at `path`. Tables exist only after the
  /// first [`rebuild`](Self::rebuild).
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// Open an in-memory database, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  async fn configure(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Flush and close the underlying connection.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Drop every table and reload them from `doc`.
  ///
  /// Runs in one transaction. Each record loads inside its own savepoint, so
  /// a record that fails is rolled back and counted without aborting the
  /// rest. Each fact row nests one more savepoint: a failing lineup, goal or
  /// penalty row is rolled back alone and the match keeps its other rows.
  /// Indexes are built after the load.
  pub async fn rebuild(&self, doc: &StoreDocument) -> Result<RebuildStats> {
    let matches = doc.matches.clone();

    let stats = self
      .conn
      .call(move |conn| {
        let mut tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        let mut stats = RebuildStats { total: matches.len(), ..RebuildStats::default() };
        for record in &matches {
          let mut sp = tx.savepoint()?;
          match load_match(&mut sp, record) {
            Ok(Some(facts)) => {
              sp.commit()?;
              stats.absorb(facts);
            }
            Ok(None) => {
              debug!(url = %record.url, "blank team name; match skipped");
              stats.skipped += 1;
            }
            Err(e) => {
              warn!(url = %record.url, error = %e, "failed to load match; rolled back");
              stats.failed += 1;
            }
          }
        }

        tx.execute_batch(INDEXES)?;
        tx.commit()?;
        Ok(stats)
      })
      .await?;

    info!(
      processed = stats.processed,
      total = stats.total,
      skipped = stats.skipped,
      failed = stats.failed,
      failed_facts = stats.failed_facts,
      "rebuilt match database"
    );
    Ok(stats)
  }

  // ── Entity resolution ─────────────────────────────────────────────────────

  pub async fn get_or_create_team(&self, name: &str) -> Result<i64> {
    let name = name.to_owned();
    let id = self
      .conn
      .call(move |conn| Ok(resolve::team(conn, &name)?))
      .await?;
    Ok(id)
  }

  pub async fn get_or_create_player(&self, name: &str) -> Result<i64> {
    let name = name.to_owned();
    let id = self
      .conn
      .call(move |conn| Ok(resolve::player(conn, &name)?))
      .await?;
    Ok(id)
  }

  pub async fn get_or_create_stadium(
    &self,
    name: &str,
    city: &str,
    capacity: u32,
  ) -> Result<i64> {
    let (name, city) = (name.to_owned(), city.to_owned());
    let id = self
      .conn
      .call(move |conn| Ok(resolve::stadium(conn, &name, &city, capacity)?))
      .await?;
    Ok(id)
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Insert one record's match row and fact rows.
///
/// Returns `None` without writing when either team name is blank.
fn load_match(
  sp: &mut Savepoint<'_>,
  record: &MatchRecord,
) -> rusqlite::Result<Option<FactCounts>> {
  let (team1, team2) = (record.team1.trim(), record.team2.trim());
  if team1.is_empty() || team2.is_empty() {
    return Ok(None);
  }

  let conn: &Connection = &**sp;
  let team1_id = resolve::team(conn, team1)?;
  let team2_id = resolve::team(conn, team2)?;
  let stadium_id = match &record.venue {
    Some(venue) => {
      resolve::stadium(conn, &venue.name, &venue.city, venue.capacity.unwrap_or(0))?
    }
    None => resolve::stadium(conn, resolve::UNKNOWN, resolve::UNKNOWN, 0)?,
  };
  let (viewers, attendance_pct) = record
    .attendance
    .map(|a| (a.viewers, a.percent))
    .unwrap_or_default();

  conn
    .prepare_cached(
      "INSERT INTO matches (
         url, text, time, team1_id, team2_id, home_score, away_score,
         stadium_id, viewers, attendance_pct
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?
    .execute(params![
      record.url,
      record.raw_text,
      record.kickoff_time.as_deref().and_then(normalize_kickoff),
      team1_id,
      team2_id,
      record.score.home,
      record.score.away,
      stadium_id,
      viewers,
      attendance_pct,
    ])?;
  let match_id = conn.last_insert_rowid();

  let mut facts = FactCounts::default();

  let lineups = [(team1_id, &record.lineup_team1), (team2_id, &record.lineup_team2)];
  for (team_id, entries) in lineups {
    for entry in entries {
      let rows = fact_row(sp, &mut facts, &entry.name, |conn, player_id| {
        conn
          .prepare_cached(
            "INSERT OR IGNORE INTO match_lineups (match_id, team_id, player_id, position)
             VALUES (?1, ?2, ?3, ?4)",
          )?
          .execute(params![match_id, team_id, player_id, entry.position])
      })?;
      facts.lineups += rows;
    }
  }

  let goals = [(team1_id, &record.goals_team1), (team2_id, &record.goals_team2)];
  for (team_id, scorers) in goals {
    for scorer in scorers {
      let rows = fact_row(sp, &mut facts, scorer, |conn, player_id| {
        conn
          .prepare_cached("INSERT INTO goals (match_id, team_id, player_id) VALUES (?1, ?2, ?3)")?
          .execute(params![match_id, team_id, player_id])
      })?;
      facts.goals += rows;
    }
  }

  for name in &record.penalties {
    let rows = fact_row(sp, &mut facts, name, |conn, player_id| {
      conn
        .prepare_cached("INSERT INTO penalties (match_id, player_id) VALUES (?1, ?2)")?
        .execute(params![match_id, player_id])
    })?;
    facts.penalties += rows;
  }

  Ok(Some(facts))
}

/// Resolve `name` and run `insert` for it inside a nested savepoint.
///
/// A blank name is dropped. A failing statement rolls back this row alone
/// and is counted in `facts.failed`. Returns the rows inserted.
fn fact_row(
  sp: &mut Savepoint<'_>,
  facts: &mut FactCounts,
  name: &str,
  insert: impl FnOnce(&Connection, i64) -> rusqlite::Result<usize>,
) -> rusqlite::Result<usize> {
  let name = name.trim();
  if name.is_empty() {
    facts.dropped += 1;
    return Ok(0);
  }

  let fact = sp.savepoint()?;
  let inserted = resolve::player(&fact, name).and_then(|player_id| insert(&fact, player_id));
  match inserted {
    Ok(rows) => {
      fact.commit()?;
      Ok(rows)
    }
    Err(e) => {
      debug!(player = name, error = %e, "fact row rolled back");
      facts.failed += 1;
      Ok(0)
    }
  }
}

/// Zero-pad a kickoff time to `HH:MM` so times compare as strings.
pub fn normalize_kickoff(time: &str) -> Option<String> {
  NaiveTime::parse_from_str(time.trim(), "%H:%M")
    .ok()
    .map(|t| t.format("%H:%M").to_string())
}
