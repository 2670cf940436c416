//! End-to-end runs against an in-memory match source and temp directories.

use std::{collections::HashMap, path::PathBuf};

use chrono::NaiveDate;
use rink_core::{
  report::{ALL_LEAGUES, RunRequest},
  source::{MatchPage, MatchSource, MatchSummary},
};
use rink_store_json::{FsCache, JsonStore};
use rink_store_sqlite::SqliteStore;
use tempfile::TempDir;

use crate::{FailReason, MatchOutcome, Pipeline, SkipReason};

const BASE: &str = "https://example.test/stat/hockey/";
const PAGE: &str = "https://example.test/stat/hockey/#2025-10-05";

fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 10, 6).unwrap() }

fn request(league: &str) -> RunRequest {
  RunRequest { days_to_scrape: 1, league_filter: league.into() }
}

fn tokens(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

// ─── Fake source ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("nothing at {0}")]
struct NotFound(String);

#[derive(Default)]
struct FakeSource {
  results: HashMap<String, Vec<MatchSummary>>,
  pages:   HashMap<String, MatchPage>,
}

impl MatchSource for FakeSource {
  type Error = NotFound;

  async fn fetch_match_summaries(&self, url: &str) -> Result<Vec<MatchSummary>, NotFound> {
    self
      .results
      .get(url)
      .cloned()
      .ok_or_else(|| NotFound(url.to_owned()))
  }

  async fn fetch_match_page(&self, url: &str) -> Result<MatchPage, NotFound> {
    self
      .pages
      .get(url)
      .cloned()
      .ok_or_else(|| NotFound(url.to_owned()))
  }
}

fn summary(raw_text: &str, url: &str) -> MatchSummary {
  MatchSummary { raw_text: raw_text.into(), url: url.into(), source_url: PAGE.into() }
}

/// Five rows: two complete matches, one too short, one whose match page is
/// missing, one without a second team.
fn source() -> FakeSource {
  let khl = "https://example.test/hockey/khl/match/1";
  let vhl = "https://example.test/hockey/vhl/match/2";

  let mut source = FakeSource::default();
  source.results.insert(PAGE.into(), vec![
    summary("19:30 Авангард – Трактор 3 2 окончен", khl),
    summary("12:00 Сибирь – Лада 2 1", vhl),
    summary("short", "https://example.test/hockey/khl/match/3"),
    summary("19:00 Амур – Барыс 1 0", "https://example.test/hockey/khl/match/4"),
    summary("19:30 Авангард 3 2", "https://example.test/hockey/khl/match/5"),
  ]);
  source.pages.insert(khl.into(), MatchPage {
    roster_tokens:     tokens(&["Иван Петров", "Олег Сидоров", "Павел Смирнов", "Антон Волков"]),
    goal_event_tokens: tokens(&[
      "Иван Петров",
      "Олег Сидоров",
      "Иван Петров",
      "Павел Смирнов",
      "Антон Волков",
      "Павел Смирнов",
    ]),
    venue_text:        Some("Мегаспорт (Москва, Россия) 8 500 / 71% / 12 100".into()),
    venue_name:        Some("Мегаспорт".into()),
  });
  source.pages.insert(vhl.into(), MatchPage::default());
  source
}

struct Workspace {
  dir: TempDir,
}

impl Workspace {
  fn new() -> Self { Self { dir: tempfile::tempdir().unwrap() } }

  fn json(&self) -> PathBuf { self.dir.path().join("matches.json") }

  fn db(&self) -> PathBuf { self.dir.path().join("db").join("matches.db") }

  fn cache(&self) -> FsCache { FsCache::new(self.dir.path().join("cache")) }

  fn pipeline(&self, source: FakeSource) -> Pipeline<FakeSource> {
    Pipeline::new(source, JsonStore::new(self.json()), self.db(), BASE)
  }
}

// ─── Runs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_run_reports_every_outcome() {
  let ws = Workspace::new();
  let report = ws
    .pipeline(source())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  assert_eq!(report.batches.len(), 1);
  let batch = &report.batches[0];
  assert_eq!(batch.source_url, PAGE);
  assert_eq!(batch.found, 5);
  assert_eq!(batch.extracted, 2);
  assert_eq!(batch.skipped, 1);
  assert_eq!(batch.failed, 2);
  assert_eq!(batch.added, 2);
  assert!(!batch.from_cache);

  assert_eq!(report.found, 5);
  assert_eq!(report.added, 2);
  assert_eq!(report.total_matches, 2);
  assert_eq!(report.processed, 2);
  assert_eq!(report.json_path, ws.json());
  assert_eq!(report.db_path, ws.db());
}

#[tokio::test]
async fn run_persists_store_and_database() {
  let ws = Workspace::new();
  ws.pipeline(source())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  let doc = JsonStore::new(ws.json()).load();
  assert_eq!(doc.len(), 2);
  assert!(doc.source_urls.contains(PAGE));

  let first = &doc.matches[0];
  assert_eq!(first.team1, "Авангард");
  assert_eq!(first.kickoff_time.as_deref(), Some("19:30"));
  assert_eq!(first.goals_team1, tokens(&["Иван Петров", "Олег Сидоров", "Иван Петров"]));
  assert_eq!(first.goals_team2, tokens(&["Павел Смирнов", "Антон Волков"]));
  assert_eq!(first.penalties, tokens(&["Павел Смирнов"]));
  assert_eq!(first.venue.as_ref().map(|v| v.name.as_str()), Some("Мегаспорт"));
  assert_eq!(first.venue.as_ref().map(|v| v.city.as_str()), Some("Москва"));

  let db = SqliteStore::open(ws.db()).await.unwrap();
  let scorers = db.top_scorers(1).await.unwrap();
  assert_eq!(scorers[0].player, "Иван Петров");
  assert_eq!(scorers[0].count, 2);
  assert_eq!(db.all_matches().await.unwrap().len(), 2);
  assert_eq!(db.foreign_key_violations().await.unwrap(), 0);
}

#[tokio::test]
async fn rerun_adds_nothing() {
  let ws = Workspace::new();
  let pipeline = ws.pipeline(source());
  pipeline.run(&request(ALL_LEAGUES), today()).await.unwrap();
  let before = JsonStore::new(ws.json()).load();

  let report = pipeline.run(&request(ALL_LEAGUES), today()).await.unwrap();
  assert_eq!(report.added, 0);
  assert_eq!(report.total_matches, 2);
  assert_eq!(report.batches[0].extracted, 0);

  let after = JsonStore::new(ws.json()).load();
  assert_eq!(after.matches, before.matches);
}

#[tokio::test]
async fn league_filter_skips_other_leagues() {
  let ws = Workspace::new();
  let report = ws.pipeline(source()).run(&request("khl"), today()).await.unwrap();

  assert_eq!(report.batches[0].extracted, 1);
  assert_eq!(report.batches[0].skipped, 2);
  assert_eq!(report.total_matches, 1);
}

#[tokio::test]
async fn unreachable_results_page_still_builds_database() {
  let ws = Workspace::new();
  let report = ws
    .pipeline(FakeSource::default())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  assert_eq!(report.found, 0);
  assert_eq!(report.total_matches, 0);

  let db = SqliteStore::open(ws.db()).await.unwrap();
  assert!(db.table_counts().await.unwrap().values().all(|n| *n == 0));
}

#[tokio::test]
async fn database_is_swapped_into_place() {
  let ws = Workspace::new();
  let building = PathBuf::from(format!("{}.building", ws.db().display()));
  std::fs::create_dir_all(ws.db().parent().unwrap()).unwrap();
  std::fs::write(&building, b"left over from a cancelled run").unwrap();

  ws.pipeline(source())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  assert!(ws.db().exists());
  assert!(!building.exists());
}

// ─── Cache ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cached_page_replays_without_the_network() {
  let ws = Workspace::new();
  ws.pipeline(source())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();
  assert!(ws.cache().entry_path(PAGE).exists());

  let fresh = Workspace::new();
  let report = Pipeline::new(FakeSource::default(), JsonStore::new(fresh.json()), fresh.db(), BASE)
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  let batch = &report.batches[0];
  assert!(batch.from_cache);
  assert_eq!(batch.found, 2);
  assert_eq!(batch.extracted, 2);
  assert_eq!(report.total_matches, 2);
  assert_eq!(report.processed, 2);
}

#[tokio::test]
async fn cached_page_is_filtered_by_league() {
  let ws = Workspace::new();
  ws.pipeline(source())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  let fresh = Workspace::new();
  let report = fresh
    .pipeline(FakeSource::default())
    .with_cache(ws.cache())
    .run(&request("vhl"), today())
    .await
    .unwrap();

  assert_eq!(report.batches[0].extracted, 1);
  assert_eq!(report.batches[0].skipped, 1);
  assert_eq!(report.total_matches, 1);
}

#[tokio::test]
async fn cache_written_under_a_league_filter_serves_every_league() {
  let ws = Workspace::new();
  ws.pipeline(source())
    .with_cache(ws.cache())
    .run(&request("khl"), today())
    .await
    .unwrap();

  let fresh = Workspace::new();
  let report = fresh
    .pipeline(FakeSource::default())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  assert!(report.batches[0].from_cache);
  assert_eq!(report.batches[0].extracted, 2);
  assert_eq!(report.total_matches, 2);
}

#[tokio::test]
async fn stored_rows_still_reach_the_cache() {
  let ws = Workspace::new();
  ws.pipeline(source())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();

  let report = ws
    .pipeline(source())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();
  assert_eq!(report.batches[0].extracted, 0);
  assert!(ws.cache().entry_path(PAGE).exists());

  let fresh = Workspace::new();
  let report = fresh
    .pipeline(FakeSource::default())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();
  assert_eq!(report.batches[0].extracted, 2);
  assert_eq!(report.total_matches, 2);
}

#[tokio::test]
async fn empty_pages_are_not_cached() {
  let ws = Workspace::new();
  ws.pipeline(FakeSource::default())
    .with_cache(ws.cache())
    .run(&request(ALL_LEAGUES), today())
    .await
    .unwrap();
  assert!(!ws.cache().entry_path(PAGE).exists());
}

// ─── Single matches ──────────────────────────────────────────────────────────

#[tokio::test]
async fn process_match_outcomes() {
  let ws = Workspace::new();
  let pipeline = ws.pipeline(source());
  let doc = Default::default();
  let all = request(ALL_LEAGUES);

  let outcome = pipeline
    .process_match(&summary("19:00 Амур – Барыс 1 0", "u/missing"), &all, &doc)
    .await;
  assert!(matches!(outcome, MatchOutcome::Failed(FailReason::PageUnavailable(_))));

  let outcome = pipeline
    .process_match(&summary("19:30 Авангард 3 2", "u/x"), &all, &doc)
    .await;
  assert!(matches!(outcome, MatchOutcome::Failed(FailReason::NoTeams)));

  let outcome = pipeline
    .process_match(&summary("19:30 Авангард – Трактор окончен", "u/x"), &all, &doc)
    .await;
  assert!(matches!(outcome, MatchOutcome::Failed(FailReason::NoScore(_))));

  let outcome = pipeline.process_match(&summary("3 2", "u/x"), &all, &doc).await;
  assert!(matches!(outcome, MatchOutcome::Skipped(SkipReason::TooShort)));
}

#[tokio::test]
async fn stored_urls_are_not_fetched_again() {
  let ws = Workspace::new();
  let pipeline = ws.pipeline(source());
  pipeline.run(&request(ALL_LEAGUES), today()).await.unwrap();
  let doc = pipeline.store().load();

  let outcome = pipeline
    .process_match(
      &summary("19:30 Авангард – Трактор 3 2 окончен", "https://example.test/hockey/khl/match/1"),
      &request(ALL_LEAGUES),
      &doc,
    )
    .await;
  assert!(matches!(outcome, MatchOutcome::Skipped(SkipReason::AlreadyStored)));
}
