//! [`JsonStore`]: the on-disk home of the [`StoreDocument`].

use std::{
  fs,
  path::{Path, PathBuf},
};

use rink_core::document::StoreDocument;
use tracing::{debug, warn};

use crate::{Error, Result};

/// A store document persisted as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStore {
  path: PathBuf,
}

impl JsonStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Read the persisted document.
  ///
  /// A missing, unreadable or truncated file yields an empty document: the
  /// run starts over rather than failing.
  pub fn load(&self) -> StoreDocument {
    let bytes = match fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = ?self.path, "no store document yet; starting empty");
        return StoreDocument::default();
      }
      Err(e) => {
        warn!(path = ?self.path, error = %e, "store document unreadable; starting empty");
        return StoreDocument::default();
      }
    };

    match serde_json::from_slice::<StoreDocument>(&bytes) {
      Ok(doc) => {
        debug!(path = ?self.path, matches = doc.len(), "loaded store document");
        doc
      }
      Err(e) => {
        warn!(path = ?self.path, error = %e, "store document corrupt; starting empty");
        StoreDocument::default()
      }
    }
  }

  /// Overwrite the persisted document.
  ///
  /// The JSON is written to a sibling `.tmp` file first and renamed over the
  /// target, so readers see either the old or the new document.
  pub fn save(&self, doc: &StoreDocument) -> Result<()> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }

    let mut json = serde_json::to_vec_pretty(doc)?;
    json.push(b'\n');

    let tmp = self.tmp_path();
    fs::write(&tmp, &json).map_err(Error::io(&tmp))?;
    fs::rename(&tmp, &self.path).map_err(Error::io(&self.path))?;

    debug!(path = ?self.path, matches = doc.len(), "saved store document");
    Ok(())
  }

  fn tmp_path(&self) -> PathBuf {
    let mut name = self.path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    self.path.with_file_name(name)
  }
}
