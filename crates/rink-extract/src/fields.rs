//! Scalar fields of a match: kickoff time, score, venue and crowd.

use std::sync::LazyLock;

use regex::Regex;
use rink_core::record::{Attendance, Score, Venue};

use crate::{
  error::{Error, Result},
  vocab::REFEREE_WORDS,
};

static KICKOFF_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d{1,2}:\d{2})").expect("kickoff pattern"));

/// City is the first component inside the parentheses: `(Москва, Россия)`.
static CITY_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\(([^,()]+),\s*[\p{L}][\p{L}\s.\-]*\)").expect("city pattern"));

/// Whole numbers, allowing space-separated thousands groups (`12 100`).
static NUMBER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d{1,3}(?:[ \u{a0}]\d{3})+|\d+").expect("number pattern"));

/// Leading `H:MM` / `HH:MM` of the trimmed text.
pub fn extract_kickoff_time(raw_text: &str) -> Option<String> {
  KICKOFF_RE
    .captures(raw_text.trim())
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_owned())
}

/// The first two purely numeric tokens, assigned home then away.
pub fn extract_score(raw_text: &str) -> Result<Score> {
  let numeric: Vec<&str> = raw_text
    .split_whitespace()
    .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
    .take(2)
    .collect();

  let [home, away] = numeric.as_slice() else {
    return Err(Error::MissingScore { found: numeric.len(), text: raw_text.to_owned() });
  };

  let parse = |token: &str| {
    token
      .parse::<u32>()
      .map_err(|_| Error::ScoreOutOfRange(token.to_owned()))
  };
  Ok(Score::new(parse(*home)?, parse(*away)?))
}

// ─── Venue ───────────────────────────────────────────────────────────────────

/// Arena and crowd figures parsed from a match-info row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInfo {
  pub venue:      Option<Venue>,
  pub attendance: Option<Attendance>,
}

/// Parse a row such as `"Мегаспорт (Москва, Россия) 8 500 / 71% / 12 100"`.
///
/// `arena` is the arena's link text when the page marks it up separately;
/// it is taken as the name verbatim. Otherwise the name is the text before
/// the parenthesised city, or before the first digit when there is none.
///
/// Numbers after the city are taken in order as viewers, attendance percent
/// and capacity. When capacity is absent it is derived from viewers and
/// percent. Rows naming match officials yield nothing.
pub fn parse_venue(venue_text: &str, arena: Option<&str>) -> VenueInfo {
  let text = venue_text.trim();
  let lower = text.to_lowercase();
  if text.is_empty() || REFEREE_WORDS.iter().any(|w| lower.contains(w)) {
    return VenueInfo::default();
  }

  let arena = arena.map(str::trim).filter(|a| !a.is_empty());

  let (head, figures) = match text.find('(') {
    Some(open) => {
      let close = text[open..].find(')').map_or(text.len(), |i| open + i + 1);
      (&text[..open], &text[close..])
    }
    None => {
      let after_arena = arena.and_then(|a| text.find(a).map(|i| i + a.len()));
      let start = after_arena
        .or_else(|| text.find(|c: char| c.is_ascii_digit()))
        .unwrap_or(text.len());
      text.split_at(start)
    }
  };
  let name = arena.unwrap_or_else(|| head.trim().trim_end_matches([',', '/', '-']).trim());

  let city = CITY_RE
    .captures(text)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim().to_owned())
    .unwrap_or_default();

  let numbers: Vec<u32> = NUMBER_RE
    .find_iter(figures)
    .filter_map(|m| {
      m.as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()
    })
    .collect();

  let viewers = numbers.first().copied();
  let percent = numbers.get(1).copied().unwrap_or(0);
  let capacity = numbers
    .get(2)
    .copied()
    .or_else(|| viewers.and_then(|v| derive_capacity(v, percent)));

  VenueInfo {
    venue:      (!name.is_empty()).then(|| Venue {
      name: name.to_owned(),
      city,
      capacity,
    }),
    attendance: viewers.map(|viewers| Attendance { viewers, percent }),
  }
}

fn derive_capacity(viewers: u32, percent: u32) -> Option<u32> {
  if !(1..=100).contains(&percent) {
    return None;
  }
  u32::try_from(u64::from(viewers) * 100 / u64::from(percent)).ok()
}
