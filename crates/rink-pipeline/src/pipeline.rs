//! [`Pipeline`]: scrape, extract, merge and project, one results page at a
//! time.

use std::{
  path::{Path, PathBuf},
  time::Instant,
};

use chrono::{NaiveDate, Utc};
use rink_core::{
  document::StoreDocument,
  record::{LineupEntry, MatchRecord, decode_batch, encode_batch},
  report::{BatchSummary, RunReport, RunRequest},
  source::{MatchSource, MatchSummary, ScrapeCache},
};
use rink_extract::{
  LineupAttributor, NameValidator, extract_kickoff_time, extract_score, extract_teams,
  parse_venue,
};
use rink_store_json::{FsCache, JsonStore};
use rink_store_sqlite::{RebuildStats, SqliteStore};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  outcome::{FailReason, MIN_SUMMARY_CHARS, MatchOutcome, SkipReason, tally},
  urls::results_page_urls,
};

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Drives one run end to end over a [`MatchSource`], an optional
/// [`ScrapeCache`], the JSON store and the match database.
pub struct Pipeline<S, C = FsCache> {
  source:     S,
  cache:      Option<C>,
  store:      JsonStore,
  db_path:    PathBuf,
  base_url:   String,
  attributor: LineupAttributor,
}

impl<S: MatchSource> Pipeline<S, FsCache> {
  /// A pipeline without a scrape cache.
  pub fn new(
    source: S,
    store: JsonStore,
    db_path: impl Into<PathBuf>,
    base_url: impl Into<String>,
  ) -> Self {
    Self {
      source,
      cache: None,
      store,
      db_path: db_path.into(),
      base_url: base_url.into(),
      attributor: LineupAttributor::new(NameValidator::default()),
    }
  }
}

impl<S: MatchSource, C: ScrapeCache> Pipeline<S, C> {
  pub fn with_cache<C2: ScrapeCache>(self, cache: C2) -> Pipeline<S, C2> {
    Pipeline {
      source:     self.source,
      cache:      Some(cache),
      store:      self.store,
      db_path:    self.db_path,
      base_url:   self.base_url,
      attributor: self.attributor,
    }
  }

  pub fn with_validator(mut self, validator: NameValidator) -> Self {
    self.attributor = LineupAttributor::new(validator);
    self
  }

  pub fn store(&self) -> &JsonStore { &self.store }

  pub fn db_path(&self) -> &Path { &self.db_path }

  /// Scrape every results page `request` covers, merge the new records into
  /// the JSON store, then rebuild the match database from the whole store.
  ///
  /// The store is saved after each page, so a failure part-way through
  /// keeps what was merged so far.
  pub async fn run(&self, request: &RunRequest, today: NaiveDate) -> Result<RunReport> {
    let parse_started = Instant::now();
    let mut doc = self.store.load();
    let mut batches = Vec::new();

    for url in results_page_urls(&self.base_url, today, request.days_to_scrape) {
      let (mut batch, records) = self.scrape_page(&url, request, &doc).await;

      let (merged, added) = doc.merge(records, Utc::now());
      doc = merged;
      batch.added = added;
      self.store.save(&doc)?;

      info!(
        url = %batch.source_url,
        found = batch.found,
        extracted = batch.extracted,
        skipped = batch.skipped,
        failed = batch.failed,
        added,
        from_cache = batch.from_cache,
        "processed results page"
      );
      batches.push(batch);
    }
    let parse_time = parse_started.elapsed();

    let build_started = Instant::now();
    let stats = self.build_database(&doc).await?;
    let build_time = build_started.elapsed();

    Ok(RunReport {
      request: request.clone(),
      found: batches.iter().map(|b| b.found).sum(),
      total_matches: doc.len(),
      processed: stats.processed,
      added: batches.iter().map(|b| b.added).sum(),
      parse_time_seconds: parse_time.as_secs_f64(),
      db_build_time_seconds: build_time.as_secs_f64(),
      json_path: self.store.path().to_path_buf(),
      db_path: self.db_path.clone(),
      batches,
    })
  }

  // ── Scraping ──────────────────────────────────────────────────────────────

  /// One results page, from the cache when possible.
  ///
  /// The cache holds every record the page yielded, whatever the league or
  /// the store, so `request` and `doc` are applied after the lookup.
  async fn scrape_page(
    &self,
    url: &str,
    request: &RunRequest,
    doc: &StoreDocument,
  ) -> (BatchSummary, Vec<MatchRecord>) {
    let (outcomes, from_cache) = match self.cached(url) {
      Some(records) => (
        records
          .into_iter()
          .map(|r| MatchOutcome::Extracted(Box::new(r)))
          .collect(),
        true,
      ),
      None => (self.extract_page(url, doc).await, false),
    };

    if !from_cache {
      let records: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
          MatchOutcome::Extracted(record) => Some(record.as_ref().clone()),
          _ => None,
        })
        .collect();
      if !records.is_empty() {
        self.remember(url, &records);
      }
    }

    let outcomes = outcomes.into_iter().map(|outcome| screen(outcome, request, doc));
    let (mut batch, records) = tally(url, outcomes);
    batch.from_cache = from_cache;
    (batch, records)
  }

  /// Every row of a live results page, before any filtering.
  async fn extract_page(&self, url: &str, doc: &StoreDocument) -> Vec<MatchOutcome> {
    let summaries = match self.source.fetch_match_summaries(url).await {
      Ok(summaries) => summaries,
      Err(e) => {
        warn!(url, error = %e, "failed to fetch results page");
        Vec::new()
      }
    };

    let mut outcomes = Vec::with_capacity(summaries.len());
    for summary in &summaries {
      let outcome = self.extract_match(summary, doc).await;
      match &outcome {
        MatchOutcome::Skipped(reason) => debug!(url = %summary.url, %reason, "skipped match"),
        MatchOutcome::Failed(reason) => warn!(url = %summary.url, %reason, "failed match"),
        MatchOutcome::Extracted(_) => {}
      }
      outcomes.push(outcome);
    }
    outcomes
  }

  /// Turn one summary row plus its match page into a record, then apply the
  /// league filter and the stored-URL check.
  pub async fn process_match(
    &self,
    summary: &MatchSummary,
    request: &RunRequest,
    doc: &StoreDocument,
  ) -> MatchOutcome {
    screen(self.extract_match(summary, doc).await, request, doc)
  }

  /// Extraction alone, for any league.
  ///
  /// A URL already in `doc` is answered from the stored record instead of
  /// fetching its match page again.
  async fn extract_match(&self, summary: &MatchSummary, doc: &StoreDocument) -> MatchOutcome {
    if summary.raw_text.trim().chars().count() < MIN_SUMMARY_CHARS {
      return MatchOutcome::Skipped(SkipReason::TooShort);
    }
    if let Some(stored) = doc.get(&summary.url) {
      return MatchOutcome::Extracted(Box::new(stored.clone()));
    }

    let Some(teams) = extract_teams(&summary.raw_text) else {
      return MatchOutcome::Failed(FailReason::NoTeams);
    };
    let score = match extract_score(&summary.raw_text) {
      Ok(score) => score,
      Err(e) => return MatchOutcome::Failed(FailReason::NoScore(e.to_string())),
    };
    let page = match self.source.fetch_match_page(&summary.url).await {
      Ok(page) => page,
      Err(e) => return MatchOutcome::Failed(FailReason::PageUnavailable(e.to_string())),
    };

    let lineup = self
      .attributor
      .attribute(&page.roster_tokens, score, &page.goal_event_tokens);
    let venue = page
      .venue_text
      .as_deref()
      .map(|text| parse_venue(text, page.venue_name.as_deref()))
      .unwrap_or_default();
    if lineup.padded_goals() > 0 {
      debug!(url = %summary.url, padded = lineup.padded_goals(), "goal list padded");
    }
    let missing = lineup.missing_goals(score);
    if missing > 0 && !page.roster_tokens.is_empty() {
      warn!(url = %summary.url, %score, missing, "goal lists shorter than the score");
    }
    let goals_team1 = lineup.team1_scorers();
    let goals_team2 = lineup.team2_scorers();

    MatchOutcome::Extracted(Box::new(MatchRecord {
      raw_text: summary.raw_text.clone(),
      team1: teams.team1,
      team2: teams.team2,
      score,
      url: summary.url.clone(),
      source_url: summary.source_url.clone(),
      kickoff_time: extract_kickoff_time(&summary.raw_text),
      venue: venue.venue,
      attendance: venue.attendance,
      lineup_team1: lineup.team1_roster.into_iter().map(LineupEntry::new).collect(),
      lineup_team2: lineup.team2_roster.into_iter().map(LineupEntry::new).collect(),
      goals_team1,
      goals_team2,
      penalties: lineup.penalty_events,
    }))
  }

  // ── Cache ─────────────────────────────────────────────────────────────────

  fn cached(&self, url: &str) -> Option<Vec<MatchRecord>> {
    let cache = self.cache.as_ref()?;
    let blob = match cache.get(url) {
      Ok(blob) => blob?,
      Err(e) => {
        warn!(url, error = %e, "scrape cache read failed");
        return None;
      }
    };
    match decode_batch(&blob) {
      Ok(records) => {
        debug!(url, records = records.len(), "scrape cache hit");
        Some(records)
      }
      Err(e) => {
        warn!(url, error = %e, "ignoring undecodable cache entry");
        None
      }
    }
  }

  fn remember(&self, url: &str, records: &[MatchRecord]) {
    let Some(cache) = &self.cache else { return };
    let result = encode_batch(records)
      .map_err(|e| e.to_string())
      .and_then(|blob| cache.put(url, &blob).map_err(|e| e.to_string()));
    if let Err(error) = result {
      warn!(url, %error, "scrape cache write failed");
    }
  }

  // ── Database ──────────────────────────────────────────────────────────────

  /// Rebuild the database beside `db_path` and move it into place once
  /// complete.
  async fn build_database(&self, doc: &StoreDocument) -> Result<RebuildStats> {
    let building = building_path(&self.db_path);
    if let Some(parent) = self.db_path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(io_error(parent))?;
    }
    match tokio::fs::remove_file(&building).await {
      Ok(()) => debug!(path = ?building, "removed stale partial database"),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(io_error(&building)(e)),
    }

    let db = SqliteStore::open(&building).await?;
    let stats = db.rebuild(doc).await?;
    db.close().await?;

    tokio::fs::rename(&building, &self.db_path)
      .await
      .map_err(io_error(&self.db_path))?;
    Ok(stats)
  }
}

/// Apply the league filter and the stored-URL check to an extracted record.
fn screen(outcome: MatchOutcome, request: &RunRequest, doc: &StoreDocument) -> MatchOutcome {
  match outcome {
    MatchOutcome::Extracted(record) if !request.admits(&record.url) => {
      MatchOutcome::Skipped(SkipReason::LeagueMismatch)
    }
    MatchOutcome::Extracted(record) if doc.contains_url(&record.url) => {
      MatchOutcome::Skipped(SkipReason::AlreadyStored)
    }
    other => other,
  }
}

/// `<db_path>.building`
fn building_path(db_path: &Path) -> PathBuf {
  let mut name = db_path.as_os_str().to_owned();
  name.push(".building");
  PathBuf::from(name)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
  move |source| Error::Io { path: path.to_path_buf(), source }
}
