//! Run requests and the summaries handed back to the trigger front end.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// League filter value that keeps every match.
pub const ALL_LEAGUES: &str = "all";

/// What the trigger collaborator asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
  /// How many past days of results pages to scrape, counting back from
  /// yesterday.
  pub days_to_scrape: u32,
  /// Substring a match URL must contain (e.g. `"khl"`), or [`ALL_LEAGUES`].
  pub league_filter:  String,
}

impl RunRequest {
  /// Whether a match URL passes the league filter.
  pub fn admits(&self, match_url: &str) -> bool {
    self.league_filter == ALL_LEAGUES || match_url.contains(&self.league_filter)
  }
}

/// Per-results-page tally of match outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
  pub source_url: String,
  /// Summary rows seen on the page.
  pub found:      usize,
  pub extracted:  usize,
  pub skipped:    usize,
  pub failed:     usize,
  /// Records actually appended to the store after dedup.
  pub added:      usize,
  /// Whether the batch came from the scrape cache rather than the network.
  pub from_cache: bool,
}

/// The result summary delivered to the notifier at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
  pub request:               RunRequest,
  /// Summary rows seen across every results page.
  pub found:                 usize,
  /// Records in the store after the run.
  pub total_matches:         usize,
  /// Records the relational rebuild loaded successfully.
  pub processed:             usize,
  pub added:                 usize,
  pub parse_time_seconds:    f64,
  pub db_build_time_seconds: f64,
  pub json_path:             PathBuf,
  pub db_path:               PathBuf,
  pub batches:               Vec<BatchSummary>,
}
