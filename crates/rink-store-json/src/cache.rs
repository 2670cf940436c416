//! [`FsCache`]: scrape results cached on disk, one file per URL.
//!
//! File names are the hex SHA-256 of the URL, so any URL maps to a safe,
//! fixed-length name.

use std::{
  fs,
  path::{Path, PathBuf},
};

use rink_core::source::ScrapeCache;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FsCache {
  dir: PathBuf,
}

impl FsCache {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Where the blob for `url` lives.
  pub fn entry_path(&self, url: &str) -> PathBuf {
    self.dir.join(format!("{}.json", cache_key(url)))
  }
}

/// Hex SHA-256 of the URL bytes.
pub fn cache_key(url: &str) -> String {
  hex::encode(Sha256::digest(url.as_bytes()))
}

impl ScrapeCache for FsCache {
  type Error = Error;

  fn get(&self, url: &str) -> Result<Option<Vec<u8>>> {
    let path = self.entry_path(url);
    match fs::read(&path) {
      Ok(blob) => {
        trace!(url, ?path, "cache hit");
        Ok(Some(blob))
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(Error::io(path)(e)),
    }
  }

  fn put(&self, url: &str, blob: &[u8]) -> Result<()> {
    fs::create_dir_all(&self.dir).map_err(Error::io(&self.dir))?;
    let path = self.entry_path(url);
    fs::write(&path, blob).map_err(Error::io(&path))?;
    trace!(url, ?path, "cache put");
    Ok(())
  }
}
