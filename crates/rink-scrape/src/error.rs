//! Error type for `rink-scrape`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status { url: String, status: reqwest::StatusCode },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
