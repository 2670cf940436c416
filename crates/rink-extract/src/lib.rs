//! Text extraction for scraped match reports.
//!
//! Turns the noisy element texts of a results page and a match page into
//! typed fields: team names, score, kickoff time, venue, rosters and goal
//! scorers. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use rink_extract::{extract_kickoff_time, extract_score, extract_teams};
//!
//! let text = "19:30 Авангард – Трактор 3 2 окончен";
//! let teams = extract_teams(text).unwrap();
//! let score = extract_score(text).unwrap();
//! println!("{} {} {}, kickoff {:?}", teams.team1, score, teams.team2, extract_kickoff_time(text));
//! ```

pub mod error;
mod fields;
mod lineup;
mod name;
mod teams;
mod vocab;

pub use error::{Error, Result};
pub use fields::{VenueInfo, extract_kickoff_time, extract_score, parse_venue};
pub use lineup::{
  GoalAttribution, LineupAttributor, LineupResult, MAX_GOALS_PER_TEAM, MidpointSplitter,
  RosterSplitter,
};
pub use name::{NamePolicy, NameValidator, is_valid_player_name};
pub use teams::{TeamPair, extract_teams};
