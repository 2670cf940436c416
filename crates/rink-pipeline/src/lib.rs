//! The Rink pipeline: turns results pages into a JSON match store and a
//! relational match database.
//!
//! [`Pipeline::run`] covers one invocation: generate the results-page URLs,
//! scrape and extract each page (or replay it from the scrape cache), merge
//! new records into the store, then rebuild the database from the whole
//! store. The `rink` binary wires it to HTTP, the filesystem and the
//! console.

pub mod config;
pub mod error;
pub mod notify;
pub mod outcome;
mod pipeline;
pub mod urls;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use notify::ConsoleNotifier;
pub use outcome::{FailReason, MatchOutcome, SkipReason};
pub use pipeline::Pipeline;

#[cfg(test)]
mod tests;
