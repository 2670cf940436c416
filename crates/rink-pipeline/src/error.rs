//! Error type for `rink-pipeline`.
//!
//! Only failures that abort a run live here. Per-match problems are
//! [`MatchOutcome`](crate::MatchOutcome) values instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rink_core::Error),

  #[error("json store error: {0}")]
  Store(#[from] rink_store_json::Error),

  #[error("database error: {0}")]
  Database(#[from] rink_store_sqlite::Error),

  #[error("i/o error on {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
