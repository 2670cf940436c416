//! Per-match outcomes and their per-page tally.

use rink_core::{record::MatchRecord, report::BatchSummary};
use thiserror::Error;

/// Summaries shorter than this (in characters) cannot hold two teams and a
/// score.
pub const MIN_SUMMARY_CHARS: usize = 10;

/// What became of one summary row.
#[derive(Debug)]
pub enum MatchOutcome {
  Extracted(Box<MatchRecord>),
  Skipped(SkipReason),
  Failed(FailReason),
}

/// Rows passed over on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
  #[error("summary text too short")]
  TooShort,
  #[error("league filter does not match")]
  LeagueMismatch,
  #[error("match already stored")]
  AlreadyStored,
}

/// Rows that should have produced a record but did not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailReason {
  #[error("no team names found")]
  NoTeams,
  #[error("no score found: {0}")]
  NoScore(String),
  #[error("match page unavailable: {0}")]
  PageUnavailable(String),
}

/// Fold outcomes into a [`BatchSummary`] and the extracted records.
///
/// `added` is left at zero; it is only known after the merge.
pub fn tally(
  source_url: &str,
  outcomes: impl IntoIterator<Item = MatchOutcome>,
) -> (BatchSummary, Vec<MatchRecord>) {
  let mut summary = BatchSummary { source_url: source_url.to_owned(), ..Default::default() };
  let mut records = Vec::new();

  for outcome in outcomes {
    summary.found += 1;
    match outcome {
      MatchOutcome::Extracted(record) => {
        summary.extracted += 1;
        records.push(*record);
      }
      MatchOutcome::Skipped(_) => summary.skipped += 1,
      MatchOutcome::Failed(_) => summary.failed += 1,
    }
  }

  (summary, records)
}
