//! [`ConsoleNotifier`] prints the run report to stdout.

use std::{fmt::Write as _, io::Write as _};

use rink_core::{report::RunReport, source::Notifier};

/// A [`Notifier`] for interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  type Error = std::io::Error;

  async fn notify(&self, report: &RunReport) -> Result<(), Self::Error> {
    let text = render_report(report);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
  }
}

/// Human-readable run summary.
pub fn render_report(report: &RunReport) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "Scraped {} day(s), league filter {:?}",
    report.request.days_to_scrape, report.request.league_filter
  );
  for batch in &report.batches {
    let _ = writeln!(
      out,
      "  {}: {} found, {} extracted, {} skipped, {} failed, {} new{}",
      batch.source_url,
      batch.found,
      batch.extracted,
      batch.skipped,
      batch.failed,
      batch.added,
      if batch.from_cache { " (cached)" } else { "" },
    );
  }
  let _ = writeln!(out, "Matches found:     {}", report.found);
  let _ = writeln!(out, "Matches added:     {}", report.added);
  let _ = writeln!(
    out,
    "Database:          {} of {} stored matches processed",
    report.processed, report.total_matches
  );
  let _ = writeln!(out, "Parse time:        {:.2}s", report.parse_time_seconds);
  let _ = writeln!(out, "Database time:     {:.2}s", report.db_build_time_seconds);
  let _ = writeln!(out, "JSON store:        {}", report.json_path.display());
  let _ = writeln!(out, "Database file:     {}", report.db_path.display());
  out
}

#[cfg(test)]
mod tests {
  use rink_core::report::{BatchSummary, RunRequest};

  use super::*;

  #[test]
  fn report_mentions_processed_versus_stored() {
    let report = RunReport {
      request:               RunRequest { days_to_scrape: 2, league_filter: "khl".into() },
      found:                 5,
      total_matches:         12,
      processed:             11,
      added:                 4,
      parse_time_seconds:    1.5,
      db_build_time_seconds: 0.25,
      json_path:             "matches_data.json".into(),
      db_path:               "hockey_matches.db".into(),
      batches:               vec![BatchSummary {
        source_url: "https://example.test/#2025-01-01".into(),
        found: 5,
        extracted: 4,
        failed: 1,
        added: 4,
        from_cache: true,
        ..Default::default()
      }],
    };

    let text = render_report(&report);
    assert!(text.contains("league filter \"khl\""));
    assert!(text.contains("5 found, 4 extracted, 0 skipped, 1 failed, 4 new (cached)"));
    assert!(text.contains("11 of 12 stored matches processed"));
    assert!(text.contains("Parse time:        1.50s"));
  }
}
