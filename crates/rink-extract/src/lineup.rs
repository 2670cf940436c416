//! Roster partitioning and goal attribution for one match page.
//!
//! A match page yields a flat list of name-looking element texts for both
//! teams, plus a list of event rows: one scorer per goal, then penalty rows.
//! [`LineupAttributor`] turns those into two rosters, two goal lists and the
//! leftover penalty events.

use std::collections::HashSet;

use rink_core::record::Score;
use tracing::debug;

use crate::name::NameValidator;

/// Upper bound on goals credited to one team. Scores above it come from
/// misparsed summary lines.
pub const MAX_GOALS_PER_TEAM: usize = 50;

// ─── Roster splitting ────────────────────────────────────────────────────────

/// Divides a validated, deduplicated name list into the two teams' rosters.
pub trait RosterSplitter {
  fn split(&self, names: Vec<String>) -> (Vec<String>, Vec<String>);
}

/// Bisects the list: the first `len / 2` names are team 1, the rest team 2.
///
/// Only correct when the page lists one team's players contiguously before
/// the other's.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSplitter;

impl RosterSplitter for MidpointSplitter {
  fn split(&self, mut names: Vec<String>) -> (Vec<String>, Vec<String>) {
    let team2 = names.split_off(names.len() / 2);
    (names, team2)
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One goal credited to a player.
///
/// `attributed` is false for entries padded in by repeating the team's last
/// known scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAttribution {
  pub player:     String,
  pub attributed: bool,
}

impl GoalAttribution {
  fn scored(player: &str) -> Self {
    Self { player: player.to_owned(), attributed: true }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineupResult {
  pub team1_roster:   Vec<String>,
  pub team2_roster:   Vec<String>,
  pub team1_goals:    Vec<GoalAttribution>,
  pub team2_goals:    Vec<GoalAttribution>,
  /// Event rows past the goal cutoff, verbatim.
  pub penalty_events: Vec<String>,
}

impl LineupResult {
  pub fn team1_scorers(&self) -> Vec<String> { scorers(&self.team1_goals) }

  pub fn team2_scorers(&self) -> Vec<String> { scorers(&self.team2_goals) }

  /// Goals in `score` that no entry covers.
  ///
  /// Non-zero when a team scored but none of the consumed event rows named
  /// one of its players, or when the score exceeds [`MAX_GOALS_PER_TEAM`].
  pub fn missing_goals(&self, score: Score) -> usize {
    let short = |required: u32, credited: usize| (required as usize).saturating_sub(credited);
    short(score.home, self.team1_goals.len())
      .saturating_add(short(score.away, self.team2_goals.len()))
  }

  /// Number of goal entries that were padded rather than read off the page.
  pub fn padded_goals(&self) -> usize {
    self
      .team1_goals
      .iter()
      .chain(&self.team2_goals)
      .filter(|goal| !goal.attributed)
      .count()
  }
}

fn scorers(goals: &[GoalAttribution]) -> Vec<String> {
  goals.iter().map(|goal| goal.player.clone()).collect()
}

// ─── Attributor ──────────────────────────────────────────────────────────────

/// Partitions roster tokens and credits goal events to players.
#[derive(Debug, Clone, Default)]
pub struct LineupAttributor<S = MidpointSplitter> {
  validator: NameValidator,
  splitter:  S,
}

impl LineupAttributor<MidpointSplitter> {
  pub fn new(validator: NameValidator) -> Self {
    Self { validator, splitter: MidpointSplitter }
  }
}

impl<S: RosterSplitter> LineupAttributor<S> {
  pub fn with_splitter(validator: NameValidator, splitter: S) -> Self {
    Self { validator, splitter }
  }

  /// Build rosters from `player_tokens` and attribute the first
  /// `score.total()` entries of `goal_event_tokens` as goals.
  ///
  /// Returns an empty result when no token survives validation; a match
  /// without lineup data is still a valid match.
  pub fn attribute(
    &self,
    player_tokens: &[String],
    score: Score,
    goal_event_tokens: &[String],
  ) -> LineupResult {
    let names = self.roster_names(player_tokens);
    if names.is_empty() {
      return LineupResult::default();
    }

    let (team1_roster, team2_roster) = self.splitter.split(names);
    let cutoff = usize::try_from(score.total())
      .unwrap_or(usize::MAX)
      .min(goal_event_tokens.len());
    let (goal_tokens, rest) = goal_event_tokens.split_at(cutoff);

    let home = (score.home as usize).min(MAX_GOALS_PER_TEAM);
    let away = (score.away as usize).min(MAX_GOALS_PER_TEAM);
    if home < score.home as usize || away < score.away as usize {
      debug!(%score, cap = MAX_GOALS_PER_TEAM, "implausible score; goal lists capped");
    }
    let mut team1_goals = Vec::with_capacity(home);
    let mut team2_goals = Vec::with_capacity(away);

    for token in goal_tokens.iter().map(|t| t.trim()) {
      if team1_goals.len() < home && team1_roster.iter().any(|n| n == token) {
        team1_goals.push(GoalAttribution::scored(token));
      } else if team2_goals.len() < away && team2_roster.iter().any(|n| n == token) {
        team2_goals.push(GoalAttribution::scored(token));
      }
    }

    pad_goals(&mut team1_goals, home, "team1");
    pad_goals(&mut team2_goals, away, "team2");

    LineupResult {
      team1_roster,
      team2_roster,
      team1_goals,
      team2_goals,
      penalty_events: rest.iter().map(|t| t.trim().to_owned()).collect(),
    }
  }

  /// Trimmed, validated, first-occurrence-deduplicated names.
  fn roster_names(&self, tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
      .iter()
      .map(|t| t.trim())
      .filter(|t| self.validator.is_valid_player_name(t))
      .filter(|t| seen.insert(*t))
      .map(str::to_owned)
      .collect()
  }
}

/// Repeat the last scorer until `goals` reaches `required` entries.
fn pad_goals(goals: &mut Vec<GoalAttribution>, required: usize, side: &str) {
  if goals.len() >= required {
    return;
  }
  let Some(last) = goals.last().map(|goal| goal.player.clone()) else {
    debug!(side, required, "no scorer attributed; goal list left short");
    return;
  };

  debug!(side, required, found = goals.len(), "padding goals with last scorer");
  goals.resize(required, GoalAttribution { player: last, attributed: false });
}
