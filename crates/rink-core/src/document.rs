//! The store document: the durable, append-only source of truth.
//!
//! A [`StoreDocument`] is an explicit value: it is loaded by the caller,
//! passed through [`StoreDocument::merge`], and handed back for the caller to
//! persist. Nothing in here touches the filesystem.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::MatchRecord;

/// Insertion-ordered match records plus provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
  #[serde(default)]
  pub matches:       Vec<MatchRecord>,
  /// Results pages that contributed records. Serialised sorted.
  #[serde(default)]
  pub source_urls:   BTreeSet<String>,
  /// Always equal to `matches.len()` after a merge.
  #[serde(default)]
  pub matches_found: usize,
  #[serde(default)]
  pub last_update:   Option<DateTime<Utc>>,
}

impl StoreDocument {
  pub fn len(&self) -> usize { self.matches.len() }

  pub fn is_empty(&self) -> bool { self.matches.is_empty() }

  /// The set of dedup keys currently stored.
  pub fn urls(&self) -> HashSet<&str> {
    self.matches.iter().map(|m| m.url.as_str()).collect()
  }

  pub fn contains_url(&self, url: &str) -> bool { self.get(url).is_some() }

  pub fn get(&self, url: &str) -> Option<&MatchRecord> {
    self.matches.iter().find(|m| m.url == url)
  }

  /// Append every record whose `url` is not yet stored.
  ///
  /// Membership is decided by URL alone: a record with a known URL is
  /// dropped even if its content differs. Duplicates inside `records` are
  /// collapsed to their first occurrence. Returns the updated document and
  /// the number of records appended.
  pub fn merge(
    mut self,
    records: impl IntoIterator<Item = MatchRecord>,
    now: DateTime<Utc>,
  ) -> (Self, usize) {
    let mut known: HashSet<String> =
      self.matches.iter().map(|m| m.url.clone()).collect();
    let mut added = 0;

    for record in records {
      self.source_urls.insert(record.source_url.clone());
      if known.insert(record.url.clone()) {
        self.matches.push(record);
        added += 1;
      }
    }

    self.matches_found = self.matches.len();
    self.last_update = Some(now);
    (self, added)
  }
}
