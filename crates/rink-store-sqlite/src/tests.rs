//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use rink_core::{
  document::StoreDocument,
  record::{Attendance, LineupEntry, MatchRecord, Score, Venue},
};

use crate::{SqliteStore, TABLES, TimeFilter};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn names(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

fn lineup(items: &[&str]) -> Vec<LineupEntry> {
  items.iter().map(|s| LineupEntry::new(*s)).collect()
}

fn record(url: &str, team1: &str, team2: &str, score: Score) -> MatchRecord {
  MatchRecord {
    raw_text:     format!("{team1} – {team2} {} {}", score.home, score.away),
    team1:        team1.into(),
    team2:        team2.into(),
    score,
    url:          url.into(),
    source_url:   "https://example.test/stat/#2025-10-05".into(),
    kickoff_time: None,
    venue:        None,
    attendance:   None,
    lineup_team1: vec![],
    lineup_team2: vec![],
    goals_team1:  vec![],
    goals_team2:  vec![],
    penalties:    vec![],
  }
}

/// Two complete matches plus one with a blank team.
fn document() -> StoreDocument {
  let mut first = record("u/1", "Авангард", "Трактор", Score::new(3, 1));
  first.kickoff_time = Some("9:30".into());
  first.venue = Some(Venue {
    name:     "G-Drive Арена".into(),
    city:     "Омск".into(),
    capacity: Some(12_000),
  });
  first.attendance = Some(Attendance { viewers: 6_000, percent: 50 });
  first.lineup_team1 = vec![
    LineupEntry::new("Иван Петров"),
    LineupEntry::new("Иван Петров"),
    LineupEntry::with_position("Олег Сидоров", "вратарь"),
  ];
  first.lineup_team2 = lineup(&["Пётр Смирнов", "Антон Волков"]);
  first.goals_team1 = names(&["Иван Петров", "Иван Петров", "Олег Сидоров"]);
  first.goals_team2 = names(&["Антон Волков"]);
  first.penalties = names(&["Пётр Смирнов", "Пётр Смирнов", "Иван Петров", "  "]);

  let mut second = record("u/2", "Трактор", "Лада", Score::new(2, 0));
  second.kickoff_time = Some("19:00".into());
  second.lineup_team1 = lineup(&["Антон Волков", "Пётр Смирнов"]);
  second.lineup_team2 = lineup(&["Денис Козлов"]);
  second.goals_team1 = names(&["Антон Волков", "Антон Волков"]);

  let broken = record("u/3", "", "Лада", Score::new(1, 0));

  let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
  StoreDocument::default().merge(vec![first, second, broken], now).0
}

async fn rebuilt() -> SqliteStore {
  let s = store().await;
  s.rebuild(&document()).await.unwrap();
  s
}

// ─── Rebuild ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rebuild_reports_what_it_loaded() {
  let s = store().await;
  let stats = s.rebuild(&document()).await.unwrap();

  assert_eq!(stats.total, 3);
  assert_eq!(stats.processed, 2);
  assert_eq!(stats.skipped, 1);
  assert_eq!(stats.failed, 0);
  // Duplicate "Иван Петров" in the first lineup is stored once.
  assert_eq!(stats.lineup_rows, 7);
  assert_eq!(stats.goal_rows, 6);
  assert_eq!(stats.penalty_rows, 3);
  assert_eq!(stats.dropped_facts, 1);
  assert_eq!(stats.failed_facts, 0);
}

#[tokio::test]
async fn rebuild_row_counts() {
  let s = rebuilt().await;
  let counts = s.table_counts().await.unwrap();

  assert_eq!(counts["teams"], 3);
  assert_eq!(counts["players"], 5);
  assert_eq!(counts["stadiums"], 2);
  assert_eq!(counts["matches"], 2);
  assert_eq!(counts["match_lineups"], 7);
  assert_eq!(counts["goals"], 6);
  assert_eq!(counts["penalties"], 3);
}

#[tokio::test]
async fn every_foreign_key_resolves() {
  let s = rebuilt().await;
  assert_eq!(s.foreign_key_violations().await.unwrap(), 0);
}

#[tokio::test]
async fn rebuilding_twice_is_deterministic() {
  let s = rebuilt().await;
  let first = s.table_counts().await.unwrap();
  let first_matches = s.all_matches().await.unwrap();

  s.rebuild(&document()).await.unwrap();
  assert_eq!(s.table_counts().await.unwrap(), first);
  assert_eq!(s.all_matches().await.unwrap(), first_matches);
}

#[tokio::test]
async fn empty_document_creates_every_table() {
  let s = store().await;
  let stats = s.rebuild(&StoreDocument::default()).await.unwrap();
  assert_eq!(stats.total, 0);

  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.len(), TABLES.len());
  assert!(counts.values().all(|n| *n == 0));
}

#[tokio::test]
async fn rebuild_replaces_previous_contents() {
  let s = rebuilt().await;
  s.rebuild(&StoreDocument::default()).await.unwrap();
  assert!(s.all_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_or_create_returns_existing_ids() {
  let s = store().await;
  s.rebuild(&StoreDocument::default()).await.unwrap();

  let a = s.get_or_create_team("Лада").await.unwrap();
  let b = s.get_or_create_team("Лада").await.unwrap();
  let c = s.get_or_create_team("Амур").await.unwrap();
  assert_eq!(a, b);
  assert_ne!(a, c);

  let p = s.get_or_create_player("Иван Петров").await.unwrap();
  assert_eq!(p, s.get_or_create_player("Иван Петров").await.unwrap());

  let x = s.get_or_create_stadium("Арена", "Тольятти", 6_000).await.unwrap();
  let y = s.get_or_create_stadium("Арена", "Тольятти", 0).await.unwrap();
  let z = s.get_or_create_stadium("Арена", "Казань", 0).await.unwrap();
  assert_eq!(x, y);
  assert_ne!(x, z);

  let unknown = s.get_or_create_stadium("", " ", 0).await.unwrap();
  assert_eq!(unknown, s.get_or_create_stadium("Unknown", "Unknown", 0).await.unwrap());
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn top_scorers_counts_every_goal() {
  let s = rebuilt().await;
  let scorers = s.top_scorers(10).await.unwrap();

  assert_eq!(scorers[0].player, "Антон Волков");
  assert_eq!(scorers[0].count, 3);
  assert_eq!(scorers[1].player, "Иван Петров");
  assert_eq!(scorers[1].count, 2);
  assert_eq!(s.top_scorers(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn most_penalized_players() {
  let s = rebuilt().await;
  let penalized = s.most_penalized(10).await.unwrap();

  assert_eq!(penalized.len(), 2);
  assert_eq!(penalized[0].player, "Пётр Смирнов");
  assert_eq!(penalized[0].count, 2);
}

#[tokio::test]
async fn team_stats_aggregates_per_team() {
  let s = rebuilt().await;
  let stats = s.team_stats().await.unwrap();

  let tractor = stats.iter().find(|t| t.team == "Трактор").unwrap();
  assert_eq!(tractor.matches_played, 2);
  assert_eq!(tractor.goals, 3);
  assert_eq!(tractor.penalties, 2);
  assert!((tractor.goals_per_match() - 1.5).abs() < f64::EPSILON);

  let lada = stats.iter().find(|t| t.team == "Лада").unwrap();
  assert_eq!(lada.matches_played, 1);
  assert_eq!(lada.goals, 0);

  assert_eq!(stats[0].team, "Трактор");
}

#[tokio::test]
async fn match_detail_by_id() {
  let s = rebuilt().await;
  let id = s.all_matches().await.unwrap()[0].id;
  let detail = s.match_detail(id).await.unwrap().unwrap();

  assert_eq!(detail.row.time.as_deref(), Some("09:30"));
  assert_eq!(detail.row.stadium, "G-Drive Арена");
  assert_eq!(detail.row.viewers, 6_000);
  assert_eq!(detail.capacity, 12_000);
  assert_eq!(detail.attendance_pct, 50);
  assert_eq!(detail.url, "u/1");
  assert_eq!(detail.lineup_team1.len(), 2);
  assert!(
    detail
      .lineup_team1
      .contains(&LineupEntry::with_position("Олег Сидоров", "вратарь"))
  );
  assert_eq!(detail.goals_team1[0].player, "Иван Петров");
  assert_eq!(detail.goals_team1[0].count, 2);
  assert_eq!(detail.goals_team2[0].player, "Антон Волков");
  assert_eq!(detail.penalties[0].count, 2);

  assert!(s.match_detail(9_999).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_venue_defaults() {
  let s = rebuilt().await;
  let rows = s.all_matches().await.unwrap();
  let second = rows.iter().find(|m| m.team2 == "Лада").unwrap();
  assert_eq!(second.stadium, "Unknown");
  assert_eq!(second.city, "Unknown");
  assert_eq!(second.viewers, 0);
}

#[tokio::test]
async fn matches_by_time() {
  let s = rebuilt().await;

  let morning: TimeFilter = "9:00-12:00".parse().unwrap();
  let rows = s.matches_in_time_range(&morning).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].team1, "Авангард");

  let exact: TimeFilter = "19:00".parse().unwrap();
  let rows = s.matches_in_time_range(&exact).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].score, Score::new(2, 0));

  let all_day: TimeFilter = "00:00-23:59".parse().unwrap();
  assert_eq!(s.matches_in_time_range(&all_day).await.unwrap().len(), 2);
}

#[test]
fn time_filter_parsing() {
  assert_eq!(
    "9:00 - 12:30".parse::<TimeFilter>().unwrap(),
    TimeFilter::Range { start: "09:00".into(), end: "12:30".into() },
  );
  assert_eq!("7:05".parse::<TimeFilter>().unwrap(), TimeFilter::Exact("07:05".into()));
  assert!("evening".parse::<TimeFilter>().is_err());
  assert!("19:00-".parse::<TimeFilter>().is_err());
}
