//! Element-text extraction from results pages and match pages.
//!
//! Pure functions over HTML strings, kept apart from the HTTP client so they
//! can be exercised on fixtures.

use std::{collections::HashSet, sync::LazyLock};

use reqwest::Url;
use rink_core::source::{MatchPage, MatchSummary};
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

fn selector(css: &str) -> Selector {
  Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// Match rows on a results page, across the layouts the site has used.
static MATCH_ROW: LazyLock<Selector> =
  LazyLock::new(|| selector(".results-item, .tournament-item, .js-match-item"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static ROSTER_NAME: LazyLock<Selector> = LazyLock::new(|| selector(".table-item__name"));
static EVENT_PLAYER: LazyLock<Selector> = LazyLock::new(|| selector(".match-stat__player"));
static INFO_ROW: LazyLock<Selector> = LazyLock::new(|| selector(".match-info__extra-row"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// Visible text of an element with runs of whitespace folded to one space.
fn element_text(element: ElementRef<'_>) -> String {
  element
    .text()
    .flat_map(str::split_whitespace)
    .collect::<Vec<_>>()
    .join(" ")
}

/// Every match row on a results page that links somewhere.
///
/// Relative links are resolved against `page_url`. A link seen twice is
/// reported once.
pub fn parse_results_page(html: &str, page_url: &str) -> Vec<MatchSummary> {
  let document = Html::parse_document(html);
  let base = Url::parse(page_url).ok();
  let mut seen = HashSet::new();

  document
    .select(&MATCH_ROW)
    .filter_map(|row| {
      let href = row
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .or_else(|| row.value().attr("href"))?;

      let url = match &base {
        Some(base) => base.join(href).ok()?.to_string(),
        None => href.to_owned(),
      };
      if !seen.insert(url.clone()) {
        trace!(%url, "duplicate match row");
        return None;
      }

      Some(MatchSummary {
        raw_text: element_text(row),
        url,
        source_url: page_url.to_owned(),
      })
    })
    .collect()
}

/// Roster names, scorer and penalty rows, and the venue row of a match page.
pub fn parse_match_page(html: &str) -> MatchPage {
  let document = Html::parse_document(html);

  let roster_tokens = texts(&document, &ROSTER_NAME);
  let goal_event_tokens = texts(&document, &EVENT_PLAYER);
  // The arena row is the one naming a city in parentheses.
  let venue_row = document
    .select(&INFO_ROW)
    .map(|row| (row, element_text(row)))
    .find(|(_, text)| text.contains('('));
  let venue_name = venue_row
    .as_ref()
    .and_then(|(row, _)| row.select(&ANCHOR).next())
    .map(element_text)
    .filter(|t| !t.is_empty());
  let venue_text = venue_row.map(|(_, text)| text);

  MatchPage { roster_tokens, goal_event_tokens, venue_text, venue_name }
}

fn texts(document: &Html, selector: &Selector) -> Vec<String> {
  document
    .select(selector)
    .map(element_text)
    .filter(|t| !t.is_empty())
    .collect()
}
