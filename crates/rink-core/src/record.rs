//! Match records, the unit of work flowing through the pipeline.
//!
//! A record is assembled once per scraped match and never edited afterwards.
//! The store only ever appends whole records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// Final score, positionally home/away as printed on the results page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
  pub home: u32,
  pub away: u32,
}

impl Score {
  pub fn new(home: u32, away: u32) -> Self { Self { home, away } }

  /// Number of goal events the score accounts for. Saturates rather than
  /// overflowing on nonsense scores.
  pub fn total(&self) -> u32 { self.home.saturating_add(self.away) }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.home, self.away)
  }
}

/// The arena a match was played in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
  pub name:     String,
  pub city:     String,
  /// Seating capacity, when the page states it (or it can be derived).
  pub capacity: Option<u32>,
}

/// Crowd figures reported for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
  pub viewers: u32,
  /// Share of capacity filled, in whole percent.
  pub percent: u32,
}

// ─── Lineup entries ──────────────────────────────────────────────────────────

/// A player listed in a team's lineup, optionally with their position.
///
/// Serialised as a bare string when there is no position, so documents
/// written before positions existed stay readable and diff cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLineupEntry", into = "RawLineupEntry")]
pub struct LineupEntry {
  pub name:     String,
  pub position: Option<String>,
}

impl LineupEntry {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), position: None }
  }

  pub fn with_position(name: impl Into<String>, position: impl Into<String>) -> Self {
    Self { name: name.into(), position: Some(position.into()) }
  }
}

impl From<String> for LineupEntry {
  fn from(name: String) -> Self { Self::new(name) }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLineupEntry {
  Bare(String),
  Detailed {
    name:     String,
    #[serde(default)]
    position: Option<String>,
  },
}

impl From<RawLineupEntry> for LineupEntry {
  fn from(raw: RawLineupEntry) -> Self {
    match raw {
      RawLineupEntry::Bare(name) => Self { name, position: None },
      RawLineupEntry::Detailed { name, position } => Self { name, position },
    }
  }
}

impl From<LineupEntry> for RawLineupEntry {
  fn from(entry: LineupEntry) -> Self {
    match entry.position {
      None => Self::Bare(entry.name),
      Some(position) => Self::Detailed { name: entry.name, position: Some(position) },
    }
  }
}

// ─── MatchRecord ─────────────────────────────────────────────────────────────

/// One parsed game summary plus its derived rosters, goals and penalties.
///
/// `url` is the dedup key: it is unique within a store document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
  /// The summary line exactly as scraped.
  pub raw_text:     String,
  pub team1:        String,
  pub team2:        String,
  pub score:        Score,
  /// Link to the match page.
  pub url:          String,
  /// The results page the match was found on.
  pub source_url:   String,
  #[serde(default)]
  pub kickoff_time: Option<String>,
  #[serde(default)]
  pub venue:        Option<Venue>,
  #[serde(default)]
  pub attendance:   Option<Attendance>,
  #[serde(default)]
  pub lineup_team1: Vec<LineupEntry>,
  #[serde(default)]
  pub lineup_team2: Vec<LineupEntry>,
  /// One entry per goal, in scoring order where the page gives it.
  #[serde(default)]
  pub goals_team1:  Vec<String>,
  #[serde(default)]
  pub goals_team2:  Vec<String>,
  /// Penalty / kick-off event tokens, verbatim.
  #[serde(default)]
  pub penalties:    Vec<String>,
}

// ─── Batch blobs ─────────────────────────────────────────────────────────────

/// Encode a batch of records as a JSON blob for the scrape cache.
pub fn encode_batch(records: &[MatchRecord]) -> Result<Vec<u8>> {
  Ok(serde_json::to_vec(records)?)
}

/// Decode a blob produced by [`encode_batch`].
pub fn decode_batch(blob: &[u8]) -> Result<Vec<MatchRecord>> {
  Ok(serde_json::from_slice(blob)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lineup_entry_without_position_is_a_bare_string() {
    let json = serde_json::to_string(&LineupEntry::new("Иван Петров")).unwrap();
    assert_eq!(json, "\"Иван Петров\"");
  }

  #[test]
  fn lineup_entry_accepts_both_shapes() {
    let entries: Vec<LineupEntry> = serde_json::from_str(
      r#"["Иван Петров", {"name": "Олег Сидоров", "position": "вратарь"}]"#,
    )
    .unwrap();

    assert_eq!(entries[0], LineupEntry::new("Иван Петров"));
    assert_eq!(entries[1], LineupEntry::with_position("Олег Сидоров", "вратарь"));
  }

  #[test]
  fn record_missing_optional_fields_deserialises() {
    let record: MatchRecord = serde_json::from_str(
      r#"{
        "raw_text": "19:30 Авангард – Трактор 3 2",
        "team1": "Авангард",
        "team2": "Трактор",
        "score": {"home": 3, "away": 2},
        "url": "https://example.test/match/1",
        "source_url": "https://example.test/stat"
      }"#,
    )
    .unwrap();

    assert_eq!(record.score.to_string(), "3:2");
    assert!(record.lineup_team1.is_empty());
    assert!(record.venue.is_none());
  }

  #[test]
  fn total_saturates() {
    assert_eq!(Score::new(3, 2).total(), 5);
    assert_eq!(Score::new(u32::MAX, 1).total(), u32::MAX);
  }

  #[test]
  fn truncated_blob_is_an_error() {
    assert!(decode_batch(b"[{\"raw_text\": \"x\"").is_err());
  }
}
