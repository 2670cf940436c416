//! Player-name plausibility.
//!
//! Roster tokens on a match page mix player names with team names, status
//! labels and stray numbers. [`NameValidator`] decides which tokens look like
//! a person.
//!
//! Two independent checks feed the decision:
//!
//! - the *shape* check: 1–4 words, each 1–20 characters long;
//! - the *decomposition* check: the token splits into given / middle /
//!   surname parts with a surname of at least two characters and at least
//!   one given or middle name.
//!
//! [`NamePolicy`] states how they combine. Both policies first apply the
//! same hard gates (length, characters, abbreviations, vocabularies).

use serde::{Deserialize, Serialize};

use crate::vocab::{NAME_DENYLIST, NAME_LABELS, is_team_or_city};

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 50;
const MAX_WORDS: usize = 4;
const MAX_WORD_LEN: usize = 20;
const MIN_SURNAME_LEN: usize = 2;
const MAX_ABBREVIATION_LEN: usize = 3;

/// How the shape and decomposition checks combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
  /// Either check suffices. Accepts single-word foreign names.
  #[default]
  Lenient,
  /// Both checks must pass. Rejects single words and initials-only names.
  Strict,
}

/// Decides whether a raw text token plausibly denotes a player.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator {
  policy: NamePolicy,
}

impl NameValidator {
  pub fn new(policy: NamePolicy) -> Self { Self { policy } }

  pub fn policy(&self) -> NamePolicy { self.policy }

  pub fn is_valid_player_name(&self, token: &str) -> bool {
    let name = token.trim();
    if !passes_gates(name) {
      return false;
    }

    let shape = has_name_shape(name);
    let decomposed = NameParts::decompose(name).is_some_and(|parts| parts.is_plausible());

    match self.policy {
      NamePolicy::Lenient => shape || decomposed,
      NamePolicy::Strict => shape && decomposed,
    }
  }
}

/// [`NameValidator::is_valid_player_name`] under the default policy.
pub fn is_valid_player_name(token: &str) -> bool {
  NameValidator::default().is_valid_player_name(token)
}

// ─── Hard gates ──────────────────────────────────────────────────────────────

fn passes_gates(name: &str) -> bool {
  let len = name.chars().count();
  if !(MIN_LEN..=MAX_LEN).contains(&len) {
    return false;
  }

  if name
    .chars()
    .any(|c| c.is_numeric() || !(c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '.'))
  {
    return false;
  }

  if is_abbreviation(name) {
    return false;
  }

  let lower = name.to_lowercase();
  if NAME_DENYLIST.iter().any(|banned| lower.contains(banned)) {
    return false;
  }
  if lower.split_whitespace().any(|word| NAME_LABELS.contains(&word)) {
    return false;
  }

  !is_team_or_city(&lower)
}

/// A single short all-caps token such as "СКА" or "HC".
fn is_abbreviation(name: &str) -> bool {
  !name.contains(char::is_whitespace)
    && name.chars().count() <= MAX_ABBREVIATION_LEN
    && name.chars().all(char::is_uppercase)
}

// ─── Shape check ─────────────────────────────────────────────────────────────

fn has_name_shape(name: &str) -> bool {
  let words: Vec<&str> = name.split_whitespace().collect();
  (1..=MAX_WORDS).contains(&words.len())
    && words
      .iter()
      .all(|word| (1..=MAX_WORD_LEN).contains(&word.chars().count()))
}

// ─── Decomposition check ─────────────────────────────────────────────────────

/// A name split into its conventional parts: first word given, last word
/// surname, anything between is middle.
#[derive(Debug, PartialEq, Eq)]
struct NameParts<'a> {
  given:   &'a str,
  middle:  Vec<&'a str>,
  surname: Option<&'a str>,
}

impl<'a> NameParts<'a> {
  fn decompose(name: &'a str) -> Option<Self> {
    let words: Vec<&str> = name
      .split_whitespace()
      .map(|w| w.trim_matches('.'))
      .filter(|w| !w.is_empty())
      .collect();

    match words.as_slice() {
      [] => None,
      [only] => Some(Self { given: only, middle: vec![], surname: None }),
      [given, middle @ .., surname] => Some(Self {
        given,
        middle: middle.to_vec(),
        surname: Some(surname),
      }),
    }
  }

  fn is_plausible(&self) -> bool {
    let Some(surname) = self.surname else {
      return false;
    };
    surname.chars().count() >= MIN_SURNAME_LEN
      && (!self.given.is_empty() || !self.middle.is_empty())
  }
}
