//! Run configuration, layered from an optional TOML file and `RINK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use rink_core::report::{ALL_LEAGUES, RunRequest};
use rink_extract::NamePolicy;
use rink_scrape::HttpSourceConfig;
use serde::Deserialize;

/// Everything a run needs to know that is not per-invocation.
///
/// Every field has a default, so an empty file (or none at all) is a valid
/// configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Results page; a `#YYYY-MM-DD` fragment is appended per scraped day.
  pub base_url:       String,
  pub days_to_scrape: u32,
  pub league_filter:  String,
  pub json_path:      PathBuf,
  pub db_path:        PathBuf,
  /// Scrape cache directory. `None` disables caching.
  pub cache_dir:      Option<PathBuf>,
  pub name_policy:    NamePolicy,
  pub http:           HttpSourceConfig,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      base_url:       "https://www.championat.com/stat/hockey/".into(),
      days_to_scrape: 3,
      league_filter:  ALL_LEAGUES.into(),
      json_path:      "matches_data.json".into(),
      db_path:        "hockey_matches.db".into(),
      cache_dir:      Some("cache".into()),
      name_policy:    NamePolicy::default(),
      http:           HttpSourceConfig::default(),
    }
  }
}

impl PipelineConfig {
  /// Read `path` (if it exists) and then the environment.
  ///
  /// Nested keys use a double underscore, e.g. `RINK_HTTP__TIMEOUT_SECS`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RINK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  /// The run request implied by the configuration, before CLI overrides.
  pub fn request(&self) -> RunRequest {
    RunRequest {
      days_to_scrape: self.days_to_scrape,
      league_filter:  self.league_filter.clone(),
    }
  }

  /// Expand a leading `~` in every configured path.
  pub fn expand_paths(mut self) -> Self {
    self.json_path = expand_tilde(&self.json_path);
    self.db_path = expand_tilde(&self.db_path);
    self.cache_dir = self.cache_dir.as_deref().map(expand_tilde);
    self
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
