//! [`HttpSource`] fetches pages over HTTP and hands them to [`crate::html`].

use std::time::Duration;

use reqwest::Client;
use rink_core::source::{MatchPage, MatchSource, MatchSummary};
use serde::Deserialize;
use tracing::debug;

use crate::{
  Error, Result,
  html::{parse_match_page, parse_results_page},
};

/// Client settings for [`HttpSource`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
  pub user_agent:   String,
  pub timeout_secs: u64,
}

impl Default for HttpSourceConfig {
  fn default() -> Self {
    Self {
      user_agent:   concat!("rink/", env!("CARGO_PKG_VERSION")).to_owned(),
      timeout_secs: 30,
    }
  }
}

/// A [`MatchSource`] over plain HTTP GETs.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpSource {
  client: Client,
}

impl HttpSource {
  pub fn new(config: &HttpSourceConfig) -> Result<Self> {
    let client = Client::builder()
      .user_agent(&config.user_agent)
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client })
  }

  async fn get_html(&self, url: &str) -> Result<String> {
    let resp = self.client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { url: url.to_owned(), status });
    }
    let body = resp.text().await?;
    debug!(url, bytes = body.len(), "fetched page");
    Ok(body)
  }
}

impl MatchSource for HttpSource {
  type Error = Error;

  async fn fetch_match_summaries(&self, url: &str) -> Result<Vec<MatchSummary>> {
    let html = self.get_html(url).await?;
    Ok(parse_results_page(&html, url))
  }

  async fn fetch_match_page(&self, url: &str) -> Result<MatchPage> {
    let html = self.get_html(url).await?;
    Ok(parse_match_page(&html))
  }
}
