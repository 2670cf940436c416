//! Results-page URLs for the days a run covers.

use chrono::{Days, NaiveDate};

/// One URL per day for `1..=days` days before `today`, most recent first.
///
/// Any fragment already on `base_url` is replaced by the date.
pub fn results_page_urls(base_url: &str, today: NaiveDate, days: u32) -> Vec<String> {
  let base = base_url.split('#').next().unwrap_or(base_url);
  (1..=days)
    .filter_map(|back| today.checked_sub_days(Days::new(back.into())))
    .map(|date| format!("{base}#{}", date.format("%Y-%m-%d")))
    .collect()
}
