//! Relational projection of the Rink store document.
//!
//! [`SqliteStore::rebuild`] regenerates a normalized SQLite database (teams,
//! players, stadiums, matches, lineups, goals, penalties) from a
//! [`StoreDocument`]; the query methods read it back. All access goes through
//! [`tokio_rusqlite`] so the async runtime is never blocked.
//!
//! [`StoreDocument`]: rink_core::document::StoreDocument

mod queries;
mod resolve;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use queries::{MatchDetail, MatchRow, PlayerTally, TeamStats, TimeFilter};
pub use schema::TABLES;
pub use store::{RebuildStats, SqliteStore, normalize_kickoff};

#[cfg(test)]
mod tests;
