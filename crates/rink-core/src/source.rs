//! Collaborator traits: where raw page data comes from, where whole scrape
//! results are cached, and who hears about finished runs.
//!
//! The pipeline depends on these abstractions only. Concrete implementations
//! live in `rink-scrape` (HTTP rendering), `rink-store-json` (filesystem
//! cache) and the `rink` binary (console notifier).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::report::RunReport;

// ─── Render collaborator types ───────────────────────────────────────────────

/// One row of a results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
  /// The row's visible text with line breaks folded into spaces.
  pub raw_text:   String,
  /// Link to the match page.
  pub url:        String,
  /// The results page the row was found on.
  pub source_url: String,
}

/// Element texts scraped from a single match page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPage {
  /// Every name-looking element, both teams, in page order.
  pub roster_tokens:     Vec<String>,
  /// Scorer rows followed by penalty rows, in page order.
  pub goal_event_tokens: Vec<String>,
  /// The match-info row describing the arena and crowd, if present.
  pub venue_text:        Option<String>,
  /// Text of the arena link inside the venue row, if it has one.
  #[serde(default)]
  pub venue_name:        Option<String>,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Renders pages and returns their element texts.
///
/// Implementations should not retry: the pipeline treats any error from
/// [`MatchSource::fetch_match_page`] as "no data for this match".
pub trait MatchSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List the match rows on a results page.
  fn fetch_match_summaries<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<Vec<MatchSummary>, Self::Error>> + Send + 'a;

  /// Scrape the roster, event and venue elements of one match page.
  fn fetch_match_page<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<MatchPage, Self::Error>> + Send + 'a;
}

/// A key→blob store for whole per-URL scrape results.
///
/// Keys are results-page URLs; implementations decide how to hash them.
pub trait ScrapeCache {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get(&self, url: &str) -> Result<Option<Vec<u8>>, Self::Error>;

  fn put(&self, url: &str, blob: &[u8]) -> Result<(), Self::Error>;
}

/// Receives the summary of a finished run.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn notify<'a>(
    &'a self,
    report: &'a RunReport,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
