//! Team names from a match-summary line.
//!
//! A summary row reads something like `"19:30 Ак Барс – Динамо М 3:2 ОТ"`.
//! Three strategies are tried in order:
//!
//! 1. a token scan that accumulates words into the current team and flushes
//!    on a dash, keeping known multi-word team names together;
//! 2. a regex split on a dash between two runs of letters;
//! 3. a positional walk outward from the first dash token.
//!
//! The first strategy to produce two names wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::{
  DASHES, is_dash, is_known_team_word, is_status_word, known_team_run,
};

const MIN_TEAM_LEN: usize = 2;

static TIME_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{1,2}$").expect("time pattern"));

static SCORE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+:\d+$").expect("score pattern"));

static DASH_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"([\p{L}\s]+)\s*[–—\-]\s*([\p{L}\s]+)").expect("dash split pattern")
});

/// The two sides of a match, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPair {
  pub team1: String,
  pub team2: String,
}

impl TeamPair {
  fn new(team1: impl Into<String>, team2: impl Into<String>) -> Self {
    Self { team1: team1.into(), team2: team2.into() }
  }
}

/// Extract the two team names from a raw summary line.
///
/// Returns `None` when no strategy finds two names; callers treat that as a
/// soft failure and skip the match.
pub fn extract_teams(raw_text: &str) -> Option<TeamPair> {
  let normalized = normalize(raw_text);
  let tokens: Vec<&str> = normalized.split_whitespace().collect();

  if let [team1, team2] = scan(&tokens).as_slice() {
    return Some(TeamPair::new(team1.as_str(), team2.as_str()));
  }

  split_on_dash(raw_text).or_else(|| walk_from_dash(raw_text))
}

// ─── Strategy 1: token scan ──────────────────────────────────────────────────

/// Replace everything but word characters, whitespace, dashes and colons.
fn normalize(text: &str) -> String {
  text
    .chars()
    .map(|c| {
      if c.is_alphanumeric() || c == '_' || c == ':' || c.is_whitespace() || DASHES.contains(&c)
      {
        c
      } else {
        ' '
      }
    })
    .collect()
}

fn scan(tokens: &[&str]) -> Vec<String> {
  let mut teams: Vec<String> = Vec::new();
  let mut current: Vec<&str> = Vec::new();

  let mut flush = |current: &mut Vec<&str>| {
    if !current.is_empty() {
      teams.push(current.join(" "));
      current.clear();
    }
  };

  let mut i = 0;
  while i < tokens.len() {
    let word = tokens[i];

    if is_time(word) || is_score(word) || is_status_word(word) {
      i += 1;
      continue;
    }

    if is_dash(word) {
      flush(&mut current);
      i += 1;
      continue;
    }

    if let Some(run) = known_team_run(&tokens[i..]) {
      current.extend_from_slice(&tokens[i..i + run]);
      i += run;
      continue;
    }

    if is_known_team_word(&word.to_lowercase())
      || (!is_number(word) && word.chars().count() > 1)
    {
      current.push(word);
    } else {
      flush(&mut current);
    }
    i += 1;
  }
  flush(&mut current);

  teams.retain(|team| team.chars().count() >= MIN_TEAM_LEN);
  teams
}

// ─── Strategy 2: regex split ─────────────────────────────────────────────────

fn split_on_dash(raw_text: &str) -> Option<TeamPair> {
  let caps = DASH_SPLIT_RE.captures(raw_text)?;
  let team1 = caps.get(1)?.as_str().trim();
  let team2 = caps.get(2)?.as_str().trim();

  (!team1.is_empty() && !team2.is_empty()).then(|| TeamPair::new(team1, team2))
}

// ─── Strategy 3: positional walk ─────────────────────────────────────────────

fn walk_from_dash(raw_text: &str) -> Option<TeamPair> {
  let words: Vec<&str> = raw_text.split_whitespace().collect();
  let dash = words.iter().position(|w| is_dash(w))?;

  let team1: Vec<&str> = {
    let mut left: Vec<&str> = words[..dash]
      .iter()
      .rev()
      .take_while(|w| !stops_walk(w))
      .copied()
      .collect();
    left.reverse();
    left
  };

  let team2: Vec<&str> = words[dash + 1..]
    .iter()
    .take_while(|w| !stops_walk(w))
    .copied()
    .collect();

  (!team1.is_empty() && !team2.is_empty())
    .then(|| TeamPair::new(team1.join(" "), team2.join(" ")))
}

fn stops_walk(word: &str) -> bool {
  is_time(word) || is_score(word) || is_number(word) || is_status_word(word)
}

// ─── Token classes ───────────────────────────────────────────────────────────

fn is_time(token: &str) -> bool { TIME_RE.is_match(token) }

fn is_score(token: &str) -> bool { SCORE_RE.is_match(token) }

fn is_number(token: &str) -> bool {
  !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
