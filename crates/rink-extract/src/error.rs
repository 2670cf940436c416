//! Error types for the rink-extract parsers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("expected two numeric score tokens, found {found} in {text:?}")]
  MissingScore { found: usize, text: String },

  #[error("score token {0:?} is out of range")]
  ScoreOutOfRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
