//! Error type for `rink-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A time filter that is neither `HH:MM` nor `HH:MM-HH:MM`.
  #[error("invalid time filter: {0:?}")]
  InvalidTimeFilter(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
