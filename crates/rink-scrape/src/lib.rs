//! HTTP implementation of the [`MatchSource`] render collaborator.
//!
//! Pages are fetched with [`reqwest`] and their element texts picked out
//! with CSS selectors via [`scraper`]. No JavaScript runs, so only content
//! present in the served HTML is seen.
//!
//! [`MatchSource`]: rink_core::source::MatchSource

mod html;
mod source;

pub mod error;

pub use error::{Error, Result};
pub use html::{parse_match_page, parse_results_page};
pub use source::{HttpSource, HttpSourceConfig};
