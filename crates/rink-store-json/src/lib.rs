//! Filesystem persistence for the Rink pipeline.
//!
//! - [`JsonStore`] loads and saves the [`StoreDocument`], the durable source
//!   of truth across runs.
//! - [`FsCache`] is a [`ScrapeCache`] keeping one blob per results-page URL.
//!
//! [`StoreDocument`]: rink_core::document::StoreDocument
//! [`ScrapeCache`]: rink_core::source::ScrapeCache

mod cache;
mod store;

pub mod error;

pub use cache::FsCache;
pub use error::{Error, Result};
pub use store::JsonStore;
