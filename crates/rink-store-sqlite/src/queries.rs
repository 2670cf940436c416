//! Read-side queries over a rebuilt database. None of them write.

use std::{collections::BTreeMap, str::FromStr};

use rink_core::record::{LineupEntry, Score};
use rusqlite::{Connection, OptionalExtension as _, params};
use serde::Serialize;

use crate::{Error, Result, SqliteStore, schema::TABLES, store::normalize_kickoff};

// ─── Result types ────────────────────────────────────────────────────────────

/// A player and how many goals (or penalties) they have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerTally {
  pub player: String,
  pub count:  u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStats {
  pub team:           String,
  pub matches_played: u32,
  pub goals:          u32,
  /// Penalties taken by players in the team's lineup for that match.
  pub penalties:      u32,
}

impl TeamStats {
  pub fn goals_per_match(&self) -> f64 {
    if self.matches_played == 0 {
      0.0
    } else {
      f64::from(self.goals) / f64::from(self.matches_played)
    }
  }
}

/// One line of a match listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
  pub id:      i64,
  pub time:    Option<String>,
  pub team1:   String,
  pub team2:   String,
  pub score:   Score,
  pub stadium: String,
  pub city:    String,
  pub viewers: u32,
}

/// Everything known about one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDetail {
  pub row:            MatchRow,
  pub text:           String,
  pub url:            String,
  pub attendance_pct: u32,
  pub capacity:       u32,
  /// Ordered by player name.
  pub lineup_team1:   Vec<LineupEntry>,
  pub lineup_team2:   Vec<LineupEntry>,
  pub goals_team1:    Vec<PlayerTally>,
  pub goals_team2:    Vec<PlayerTally>,
  pub penalties:      Vec<PlayerTally>,
}

// ─── Time filter ─────────────────────────────────────────────────────────────

/// Kickoff-time selector: `"HH:MM"` or an inclusive `"HH:MM-HH:MM"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFilter {
  Exact(String),
  Range { start: String, end: String },
}

impl FromStr for TimeFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let time = |part: &str| {
      normalize_kickoff(part).ok_or_else(|| Error::InvalidTimeFilter(s.to_owned()))
    };

    match s.split_once('-') {
      Some((start, end)) => Ok(Self::Range { start: time(start)?, end: time(end)? }),
      None => Ok(Self::Exact(time(s)?)),
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

const MATCH_ROW_SELECT: &str = "
  SELECT m.id, m.time, t1.name, t2.name, m.home_score, m.away_score,
         s.name, s.city, m.viewers
  FROM matches m
  JOIN teams t1         ON m.team1_id   = t1.id
  JOIN teams t2         ON m.team2_id   = t2.id
  JOIN stadiums s       ON m.stadium_id = s.id";

fn match_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MatchRow> {
  Ok(MatchRow {
    id:      row.get(0)?,
    time:    row.get(1)?,
    team1:   row.get(2)?,
    team2:   row.get(3)?,
    score:   Score::new(row.get(4)?, row.get(5)?),
    stadium: row.get(6)?,
    city:    row.get(7)?,
    viewers: row.get(8)?,
  })
}

fn tally(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlayerTally> {
  Ok(PlayerTally { player: row.get(0)?, count: row.get(1)? })
}

impl SqliteStore {
  /// Players ordered by goals scored, then name.
  pub async fn top_scorers(&self, limit: u32) -> Result<Vec<PlayerTally>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.name, COUNT(*) AS goals
           FROM goals g
           JOIN players p ON g.player_id = p.id
           GROUP BY p.id
           ORDER BY goals DESC, p.name
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(params![limit], tally)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Players ordered by penalties taken, then name.
  pub async fn most_penalized(&self, limit: u32) -> Result<Vec<PlayerTally>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.name, COUNT(*) AS penalties
           FROM penalties pen
           JOIN players p ON pen.player_id = p.id
           GROUP BY p.id
           ORDER BY penalties DESC, p.name
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(params![limit], tally)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Per-team totals, most matches first.
  pub async fn team_stats(&self) -> Result<Vec<TeamStats>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT t.name,
                  COUNT(DISTINCT m.id)             AS matches_played,
                  COALESCE(SUM(g.goal_count), 0)    AS goals,
                  COALESCE(SUM(p.penalty_count), 0) AS penalties
           FROM teams t
           LEFT JOIN matches m ON t.id = m.team1_id OR t.id = m.team2_id
           LEFT JOIN (
             SELECT team_id, match_id, COUNT(*) AS goal_count
             FROM goals
             GROUP BY team_id, match_id
           ) g ON g.team_id = t.id AND g.match_id = m.id
           LEFT JOIN (
             SELECT ml.team_id, pen.match_id, COUNT(*) AS penalty_count
             FROM penalties pen
             JOIN match_lineups ml
               ON ml.match_id = pen.match_id AND ml.player_id = pen.player_id
             GROUP BY ml.team_id, pen.match_id
           ) p ON p.team_id = t.id AND p.match_id = m.id
           GROUP BY t.id
           ORDER BY matches_played DESC, goals DESC, t.name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TeamStats {
              team:           row.get(0)?,
              matches_played: row.get(1)?,
              goals:          row.get(2)?,
              penalties:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Every match, ordered by kickoff time then id.
  pub async fn all_matches(&self) -> Result<Vec<MatchRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let sql = format!("{MATCH_ROW_SELECT} ORDER BY m.time, m.id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], match_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Matches whose kickoff time equals or falls within `filter`.
  pub async fn matches_in_time_range(&self, filter: &TimeFilter) -> Result<Vec<MatchRow>> {
    let (start, end) = match filter.clone() {
      TimeFilter::Exact(time) => (time.clone(), time),
      TimeFilter::Range { start, end } => (start, end),
    };

    let rows = self
      .conn
      .call(move |conn| {
        let sql =
          format!("{MATCH_ROW_SELECT} WHERE m.time BETWEEN ?1 AND ?2 ORDER BY m.time, m.id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params![start, end], match_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Full detail for one match, or `None` if `id` is unknown.
  pub async fn match_detail(&self, id: i64) -> Result<Option<MatchDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(load_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  /// Row count per table, for every table in the schema.
  pub async fn table_counts(&self) -> Result<BTreeMap<String, i64>> {
    let counts = self
      .conn
      .call(|conn| {
        let mut counts = BTreeMap::new();
        for table in TABLES {
          let n: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
          counts.insert((*table).to_owned(), n);
        }
        Ok(counts)
      })
      .await?;
    Ok(counts)
  }

  /// Number of rows whose foreign keys do not resolve.
  pub async fn foreign_key_violations(&self) -> Result<usize> {
    let n = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let violations = stmt
          .query_map([], |_| Ok(()))?
          .collect::<rusqlite::Result<Vec<()>>>()?;
        Ok(violations.len())
      })
      .await?;
    Ok(n)
  }
}

fn load_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<MatchDetail>> {
  let head = conn
    .query_row(
      "SELECT m.id, m.time, t1.name, t2.name, m.home_score, m.away_score,
              s.name, s.city, m.viewers,
              m.text, m.url, m.attendance_pct, s.capacity, m.team1_id, m.team2_id
       FROM matches m
       JOIN teams t1   ON m.team1_id   = t1.id
       JOIN teams t2   ON m.team2_id   = t2.id
       JOIN stadiums s ON m.stadium_id = s.id
       WHERE m.id = ?1",
      params![id],
      |row| {
        let detail = MatchDetail {
          row:            match_row(row)?,
          text:           row.get(9)?,
          url:            row.get(10)?,
          attendance_pct: row.get(11)?,
          capacity:       row.get(12)?,
          lineup_team1:   vec![],
          lineup_team2:   vec![],
          goals_team1:    vec![],
          goals_team2:    vec![],
          penalties:      vec![],
        };
        Ok((detail, row.get::<_, i64>(13)?, row.get::<_, i64>(14)?))
      },
    )
    .optional()?;

  let Some((mut detail, team1_id, team2_id)) = head else {
    return Ok(None);
  };

  detail.lineup_team1 = lineup(conn, id, team1_id)?;
  detail.lineup_team2 = lineup(conn, id, team2_id)?;
  detail.goals_team1 = goals(conn, id, team1_id)?;
  detail.goals_team2 = goals(conn, id, team2_id)?;
  detail.penalties = conn
    .prepare(
      "SELECT p.name, COUNT(*) AS penalties
       FROM penalties pen
       JOIN players p ON pen.player_id = p.id
       WHERE pen.match_id = ?1
       GROUP BY p.id
       ORDER BY penalties DESC, p.name",
    )?
    .query_map(params![id], tally)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(detail))
}

fn lineup(conn: &Connection, match_id: i64, team_id: i64) -> rusqlite::Result<Vec<LineupEntry>> {
  conn
    .prepare_cached(
      "SELECT p.name, ml.position
       FROM match_lineups ml
       JOIN players p ON ml.player_id = p.id
       WHERE ml.match_id = ?1 AND ml.team_id = ?2
       ORDER BY p.name",
    )?
    .query_map(params![match_id, team_id], |row| {
      Ok(LineupEntry { name: row.get(0)?, position: row.get(1)? })
    })?
    .collect()
}

fn goals(conn: &Connection, match_id: i64, team_id: i64) -> rusqlite::Result<Vec<PlayerTally>> {
  conn
    .prepare_cached(
      "SELECT p.name, COUNT(*) AS goals
       FROM goals g
       JOIN players p ON g.player_id = p.id
       WHERE g.match_id = ?1 AND g.team_id = ?2
       GROUP BY p.id
       ORDER BY goals DESC, p.name",
    )?
    .query_map(params![match_id, team_id], tally)?
    .collect()
}
